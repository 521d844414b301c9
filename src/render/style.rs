use crate::constants::MAX_HOUR_LAYERS;
use crate::models::ResourceKind;

pub type Rgba = [f32; 4];

pub const BACKGROUND_COLOR: u32 = 0xbb_bbbb;
pub const INFRASTRUCTURE_COLOR: u32 = 0xff_0000;
pub const TRAIN_COLOR: u32 = 0x00_0000;

const SINGLE_TRACK_COLOR: u32 = 0xff_0000;
const DOUBLE_TRACK_COLOR: u32 = 0x99_0000;
const STATION_COLOR: u32 = 0x22_44cc;

/// Opaque colour from a `0xRRGGBB` literal
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rgb(hex: u32) -> Rgba {
    let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

#[must_use]
pub fn kind_color(kind: ResourceKind) -> Rgba {
    rgb(match kind {
        ResourceKind::SingleTrack => SINGLE_TRACK_COLOR,
        ResourceKind::DoubleTrack => DOUBLE_TRACK_COLOR,
        ResourceKind::Station => STATION_COLOR,
    })
}

/// Z offsets of the infrastructure copies; the base plane is always drawn
#[allow(clippy::cast_precision_loss)]
pub fn hour_layer_offsets(hour_layers: u32) -> impl Iterator<Item = f32> {
    (0..hour_layers.clamp(1, MAX_HOUR_LAYERS)).map(|layer| layer as f32)
}
