/// How the BC1 three-color mode treats its fourth ramp entry.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Bc1AlphaMode {
    /// Entry 3 decodes to opaque black. Every BC1 pixel has alpha 255.
    #[default]
    Opaque,
    /// Entry 3 decodes to transparent black, as used by BC1 textures with 1-bit alpha.
    PunchThrough,
}

/// Decoding settings.
///
/// BC3 blocks carry their own alpha and ignore [`Bc1AlphaMode`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DecodeSettings {
    pub bc1_alpha: Bc1AlphaMode,
}

impl DecodeSettings {
    /// Every decoded BC1 pixel is opaque.
    pub const fn opaque() -> Self {
        Self {
            bc1_alpha: Bc1AlphaMode::Opaque,
        }
    }

    /// BC1 blocks in three-color mode produce transparent pixels for selector 3.
    pub const fn punch_through() -> Self {
        Self {
            bc1_alpha: Bc1AlphaMode::PunchThrough,
        }
    }
}
