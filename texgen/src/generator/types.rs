//! Texture descriptor enums.
//!
//! Each enum has a stable `u32` discriminant (written into compiled
//! textures) and a string form (used in property tables and package
//! descriptors). String parsing ignores case.

use std::fmt;
use std::str::FromStr;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident = $value:literal => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// All variants in discriminant order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Look up a variant by its wire value.
            pub fn from_u32(value: u32) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| *v as u32 == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| format!("unknown {} '{}'", $what, s))
            }
        }
    };
}

named_enum! {
    /// Shape of a texture.
    TextureType, "texture type" {
        Texture1D = 0 => "1D",
        Texture1DArray = 1 => "1D_ARRAY",
        Texture2D = 2 => "2D",
        Texture2DArray = 3 => "2D_ARRAY",
        Texture3D = 4 => "3D",
        Cube = 5 => "CUBE",
        CubeArray = 6 => "CUBE_ARRAY",
    }
}

named_enum! {
    /// Compression family a texture is compiled for.
    ///
    /// Ordering matters: platforms before [`TexturePlatform::Es2Notc`]
    /// support sRGB formats.
    TexturePlatform, "texture platform" {
        Dxtc = 0 => "DXTC",
        Pvrtc = 1 => "PVRTC",
        Atc = 2 => "ATC",
        Etc = 3 => "ETC",
        Es2Notc = 4 => "ES2_NOTC",
        Es2NotcNpot = 5 => "ES2_NOTC_NPOT",
    }
}

named_enum! {
    /// What the texture's texels mean to the renderer.
    Usage, "usage" {
        None = 0 => "None",
        ColorMap = 1 => "ColorMap",
        UiAsset = 2 => "UIAsset",
        GlossMap = 3 => "GlossMap",
        AlphaMap = 4 => "AlphaMap",
        UiLuminanceAsset = 5 => "UILuminanceAsset",
        HeightMap = 6 => "HeightMap",
        NormalMap = 7 => "NormalMap",
    }
}

named_enum! {
    /// Sampler filtering mode.
    Filter, "filter" {
        Point = 0 => "Point",
        Bilinear = 1 => "Bilinear",
        Trilinear = 2 => "Trilinear",
        Anisotropic = 3 => "Anisotropic",
    }
}

named_enum! {
    /// Sampler addressing mode.
    AddressMode, "address mode" {
        Wrap = 0 => "Wrap",
        Mirror = 1 => "Mirror",
        Clamp = 2 => "Clamp",
        Border = 3 => "Border",
        MirrorOnce = 4 => "MirrorOnce",
    }
}

named_enum! {
    /// How a compiled texture's alpha must be blended.
    BlendingMode, "blending mode" {
        None = 0 => "None",
        Straight = 1 => "Straight",
        Premultiplied = 2 => "Premultiplied",
    }
}

impl TextureType {
    /// True for the types whose array size can change.
    pub fn is_array(self) -> bool {
        matches!(
            self,
            TextureType::Texture1DArray | TextureType::Texture2DArray | TextureType::CubeArray
        )
    }
}

impl TexturePlatform {
    /// True for platforms with sRGB texture formats.
    pub fn supports_srgb(self) -> bool {
        self < TexturePlatform::Es2Notc
    }
}
