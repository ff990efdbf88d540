//! PICT opcode space as data.
//!
//! Named opcodes map to an [`OpcodeAction`]; the reserved ranges follow the
//! PICT 2 convention of encoding the payload length in the opcode itself.

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Opcode {
    Nop = 0x0000,
    /// Clip: region with its own length prefix.
    ClipRegion = 0x0001,
    BkPat = 0x0002,
    TxFont = 0x0003,
    TxFace = 0x0004,
    TxMode = 0x0005,
    SpExtra = 0x0006,
    PnSize = 0x0007,
    PnMode = 0x0008,
    PnPat = 0x0009,
    FillPat = 0x000A,
    OvSize = 0x000B,
    Origin = 0x000C,
    TxSize = 0x000D,
    FgColor = 0x000E,
    BkColor = 0x000F,
    TxRatio = 0x0010,
    VersionOp = 0x0011,
    PnLocHFrac = 0x0015,
    ChExtra = 0x0016,
    RgbFgCol = 0x001A,
    RgbBkCol = 0x001B,
    HiliteMode = 0x001C,
    HiliteColor = 0x001D,
    DefHilite = 0x001E,
    OpColor = 0x001F,
    Line = 0x0020,
    LineFrom = 0x0021,
    ShortLine = 0x0022,
    ShortLineFrom = 0x0023,
    FontName = 0x002C,
    GlyphState = 0x002E,
    FrameRect = 0x0030,
    PaintRect = 0x0031,
    EraseRect = 0x0032,
    InvertRect = 0x0033,
    FillRect = 0x0034,
    FrameSameRect = 0x0038,
    PaintSameRect = 0x0039,
    EraseSameRect = 0x003A,
    InvertSameRect = 0x003B,
    FillSameRect = 0x003C,
    /// PackBitsRect: indexed pixels with a color table.
    PackBitsRect = 0x0098,
    PackBitsRgn = 0x0099,
    /// DirectBitsRect: direct pixels behind a base-address placeholder.
    DirectBitsRect = 0x009A,
    DirectBitsRgn = 0x009B,
    ShortComment = 0x00A0,
    LongComment = 0x00A1,
    OpEndPic = 0x00FF,
    Version = 0x02FF,
    HeaderOp = 0x0C00,
    CompressedQuickTime = 0x8200,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyBitsVariant {
    /// Packed variants carry a color table and no base address.
    pub packed: bool,
    /// Clipped variants carry a clip region before the pixel data.
    pub clipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeAction {
    Nop,
    Skip(usize),
    FontName,
    ClipRegion,
    Header,
    LongComment,
    CopyBits(CopyBitsVariant),
    CompressedQuickTime,
    EndOfPicture,
    Unimplemented,
}

impl Opcode {
    pub fn action(self) -> OpcodeAction {
        use Opcode::*;
        match self {
            Nop | VersionOp | HiliteMode | DefHilite | FrameSameRect | PaintSameRect
            | EraseSameRect | InvertSameRect | FillSameRect | Version => OpcodeAction::Nop,
            OpEndPic => OpcodeAction::EndOfPicture,
            ClipRegion => OpcodeAction::ClipRegion,
            TxFont | TxFace | TxMode | PnMode | TxSize | PnLocHFrac | ChExtra | ShortLineFrom
            | ShortComment => OpcodeAction::Skip(2),
            SpExtra | PnSize | OvSize | Origin | FgColor | BkColor | LineFrom => {
                OpcodeAction::Skip(4)
            }
            RgbFgCol | RgbBkCol | HiliteColor | OpColor | ShortLine => OpcodeAction::Skip(6),
            BkPat | PnPat | FillPat | TxRatio | Line | FrameRect | PaintRect | EraseRect
            | InvertRect | FillRect | GlyphState => OpcodeAction::Skip(8),
            FontName => OpcodeAction::FontName,
            HeaderOp => OpcodeAction::Header,
            LongComment => OpcodeAction::LongComment,
            PackBitsRect | PackBitsRgn | DirectBitsRect | DirectBitsRgn => {
                OpcodeAction::CopyBits(CopyBitsVariant {
                    packed: matches!(self, PackBitsRect | PackBitsRgn),
                    clipped: matches!(self, PackBitsRgn | DirectBitsRgn),
                })
            }
            CompressedQuickTime => OpcodeAction::CompressedQuickTime,
        }
    }
}

/// Resolves any 16-bit opcode value to the action the dispatch loop takes.
pub fn action_for(value: u16) -> OpcodeAction {
    match Opcode::try_from(value) {
        Ok(opcode) => opcode.action(),
        Err(_) => match value {
            0x0300..=0x7FFF => OpcodeAction::Skip(usize::from(value >> 8) * 2),
            0x8000..=0x80FF => OpcodeAction::Nop,
            _ => OpcodeAction::Unimplemented,
        },
    }
}
