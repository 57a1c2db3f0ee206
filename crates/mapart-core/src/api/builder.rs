//! [`Converter`] ties a quantization policy to a [`Session`].

use crate::color::Rgb;
use crate::dither::{
    Atkinson, Direct, Dither, DitherMethod, DitherOptions, FloydSteinberg, GuidedOptions, GuidedPipeline,
    JarvisJudiceNinke, OrderedBlueNoise,
};
use crate::output::QuantizedRaster;
use crate::session::Session;

use super::ConvertError;

/// Image-to-raster conversion with a fixed policy and options.
///
/// `convert()` takes `&self`, so one converter can be reused across images
/// and sessions.
///
/// # Example
///
/// ```
/// use mapart_core::api::Converter;
/// use mapart_core::color::Rgb;
/// use mapart_core::dither::DitherMethod;
/// use mapart_core::session::Session;
///
/// let mut session = Session::default();
/// let converter = Converter::new().method(DitherMethod::None);
///
/// let pixels = vec![Rgb::new(250, 250, 250); 4];
/// let raster = converter.convert(&mut session, &pixels, 2, 2).unwrap();
/// assert_eq!(raster.entry_at(0, 0).block_id, "minecraft:white_wool");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    method: DitherMethod,
    options: DitherOptions,
    guided: GuidedOptions,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn method(mut self, method: DitherMethod) -> Self {
        self.method = method;
        self
    }

    #[inline]
    pub fn natural(mut self, enabled: bool) -> Self {
        self.options = self.options.natural(enabled);
        self
    }

    /// Global natural-strength ratio, 0.0..=1.0.
    #[inline]
    pub fn natural_strength(mut self, ratio: f32) -> Self {
        self.options = self.options.natural_strength(ratio);
        self
    }

    #[inline]
    pub fn guided(mut self, options: GuidedOptions) -> Self {
        self.guided = options;
        self
    }

    pub fn selected_method(&self) -> DitherMethod {
        self.method
    }

    /// Quantize a row-major sRGB image against the session's palette.
    ///
    /// The raster carries a snapshot of the palette as it was during the
    /// scan. Nothing is returned unless the whole scan completed.
    pub fn convert(
        &self,
        session: &mut Session,
        pixels: &[Rgb],
        width: usize,
        height: usize,
    ) -> Result<QuantizedRaster, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::EmptyImage { width, height });
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ConvertError::DimensionMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        if session.palette().len() > u16::MAX as usize + 1 {
            return Err(ConvertError::PaletteTooLarge(session.palette().len()));
        }

        tracing::debug!(width, height, method = %self.method, "Converting image");

        let snapshot = session.palette().snapshot();
        let (matcher, cache) = session.matcher();
        let dithered = match self.method {
            DitherMethod::None => Direct.dither(pixels, width, height, &matcher, cache, &self.options),
            DitherMethod::FloydSteinberg => {
                FloydSteinberg.dither(pixels, width, height, &matcher, cache, &self.options)
            }
            DitherMethod::JarvisJudiceNinke => {
                JarvisJudiceNinke.dither(pixels, width, height, &matcher, cache, &self.options)
            }
            DitherMethod::Atkinson => Atkinson.dither(pixels, width, height, &matcher, cache, &self.options),
            DitherMethod::Ordered => {
                OrderedBlueNoise::default().dither(pixels, width, height, &matcher, cache, &self.options)
            }
            DitherMethod::Guided => GuidedPipeline::new(self.guided).run(pixels, width, height, &matcher)?,
        };

        Ok(QuantizedRaster::new(dithered.indices, width, height, snapshot).with_diagnostics(dithered.diagnostics))
    }
}
