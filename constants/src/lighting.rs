/// Ambient fill, dark grey.
pub const AMBIENT_COLOUR: u32 = 0x404040;
pub const AMBIENT_INTENSITY: f32 = 1.0;

/// Warm key light from the upper front right.
pub const KEY_LIGHT_COLOUR: u32 = 0xffeeff;
pub const KEY_LIGHT_INTENSITY: f32 = 0.8;
pub const KEY_LIGHT_POSITION: [f32; 3] = [1.0, 1.0, 1.0];

/// Neutral fill light from behind.
pub const FILL_LIGHT_COLOUR: u32 = 0xffffff;
pub const FILL_LIGHT_INTENSITY: f32 = 0.8;
pub const FILL_LIGHT_POSITION: [f32; 3] = [-1.0, 0.5, -1.0];
