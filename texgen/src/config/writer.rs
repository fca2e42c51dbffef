//! INI serialization logic for converting `ConfigFile` → INI string.

use super::file::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let texture = &config.texture;
    let mipmaps = &config.mipmaps;
    let compile = &config.compile;

    format!(
        r#"[texture]
; What the texels mean:
;   None, ColorMap, UIAsset, GlossMap, AlphaMap, UILuminanceAsset, HeightMap, NormalMap
usage = {}
; Sampler filter: Point, Bilinear, Trilinear, Anisotropic
filter = {}
; Addressing per axis: Wrap, Mirror, Clamp, Border, MirrorOnce
address_u = {}
address_v = {}
address_w = {}

[mipmaps]
; Build a mip chain when a texture has a single level
generate = {}
; Resampling filter: Point, Bilinear, Bicubic, Gaussian, Lanczos3
filter = {}
; Keep non-power-of-two dimensions instead of rounding up
npot = {}

[compile]
; Target platform: DXTC, PVRTC, ATC, ETC, ES2_NOTC, ES2_NOTC_NPOT
platform = {}
; Allow block compression (DXTC only)
compression = {}
; Label sRGB sources as sRGB formats where the platform supports it
srgb = {}
; Premultiply colour by alpha at compile time
premultiplied_alpha = {}
"#,
        texture.usage,
        texture.filter,
        texture.address[0],
        texture.address[1],
        texture.address[2],
        mipmaps.generate,
        mipmaps.filter,
        mipmaps.npot,
        compile.platform,
        compile.compression,
        compile.srgb,
        compile.premultiplied_alpha,
    )
}
