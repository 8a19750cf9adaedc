//! # Configuration Module
//!
//! CLI-facing configuration: a flat, string/number struct parsed straight
//! out of `clap`, a `validate()` pass that turns bad input into a typed
//! [`BatchError`], and a conversion into the domain types the engine
//! actually runs on ([`ResizeRequest`], [`BatchOptions`]).
//!
//! This mirrors the two-step "parse, then validate, then convert" flow
//! common to CLI tools built on this stack: user-facing strings in, typed
//! and range-checked domain values out.

use resize_core::dimensions::ResizeMode;
use resize_core::resample::Filter;

use crate::error::BatchError;
use crate::model::{BatchOptions, ResizeRequest};

/// Resize mode as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    ScalePercent,
    FitWidth,
    FitHeight,
    ExactSize,
}

/// Filter as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterArg {
    Mitchell,
    CatmullRom,
    Box,
    Triangle,
}

impl From<FilterArg> for Filter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::Mitchell => Filter::Mitchell,
            FilterArg::CatmullRom => Filter::CatmullRom,
            FilterArg::Box => Filter::Box,
            FilterArg::Triangle => Filter::Triangle,
        }
    }
}

/// Flat configuration assembled from CLI arguments, before it is validated
/// and lowered into [`ResizeRequest`] / [`BatchOptions`].
#[derive(Clone, Debug)]
pub struct ResizeConfig {
    pub mode: ModeArg,
    pub target_width: u32,
    pub target_height: u32,
    pub scale_percent: f64,
    pub keep_aspect_ratio: bool,
    pub quality: u8,
    pub filter: FilterArg,
    pub num_threads: usize,
    pub stop_on_error: bool,
    pub max_speed: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            mode: ModeArg::FitWidth,
            target_width: 0,
            target_height: 0,
            scale_percent: 1.0,
            keep_aspect_ratio: true,
            quality: 85,
            filter: FilterArg::Mitchell,
            num_threads: 0,
            stop_on_error: false,
            max_speed: true,
        }
    }
}

impl ResizeConfig {
    /// Validates CLI-level ranges that don't depend on any particular
    /// input image (per-request ranges like quality are re-checked by
    /// [`ResizeRequest::validate`] after conversion).
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(BatchError::InvalidOption {
                field: "quality".into(),
                reason: format!("must be in 1..=100, got {}", self.quality),
            });
        }
        match self.mode {
            ModeArg::ScalePercent if self.scale_percent <= 0.0 => {
                return Err(BatchError::InvalidOption {
                    field: "scale_percent".into(),
                    reason: "must be positive".into(),
                });
            }
            ModeArg::FitWidth if self.target_width == 0 => {
                return Err(BatchError::InvalidOption {
                    field: "target_width".into(),
                    reason: "must be positive for fit-width mode".into(),
                });
            }
            ModeArg::FitHeight if self.target_height == 0 => {
                return Err(BatchError::InvalidOption {
                    field: "target_height".into(),
                    reason: "must be positive for fit-height mode".into(),
                });
            }
            ModeArg::ExactSize if self.target_width == 0 || self.target_height == 0 => {
                return Err(BatchError::InvalidOption {
                    field: "target_width/target_height".into(),
                    reason: "both must be positive for exact-size mode".into(),
                });
            }
            _ => {}
        }
        Ok(())
    }

    pub fn to_resize_request(&self) -> ResizeRequest {
        let mode = match self.mode {
            ModeArg::ScalePercent => ResizeMode::ScalePercent(self.scale_percent),
            ModeArg::FitWidth => ResizeMode::FitWidth(self.target_width),
            ModeArg::FitHeight => ResizeMode::FitHeight(self.target_height),
            ModeArg::ExactSize => ResizeMode::ExactSize(self.target_width, self.target_height),
        };
        ResizeRequest {
            mode,
            keep_aspect_ratio: self.keep_aspect_ratio,
            quality: self.quality,
            filter: self.filter.into(),
        }
    }

    pub fn to_batch_options(&self) -> BatchOptions {
        BatchOptions {
            num_threads: self.num_threads,
            stop_on_error: self.stop_on_error,
            max_speed: self.max_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ResizeConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_quality_is_invalid() {
        let mut config = ResizeConfig::default();
        config.quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn fit_width_requires_target_width() {
        let mut config = ResizeConfig {
            mode: ModeArg::FitWidth,
            target_width: 0,
            ..ResizeConfig::default()
        };
        assert!(config.validate().is_err());
        config.target_width = 800;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn conversion_round_trips_scale_percent() {
        let config = ResizeConfig {
            mode: ModeArg::ScalePercent,
            scale_percent: 0.5,
            ..ResizeConfig::default()
        };
        let req = config.to_resize_request();
        assert_eq!(req.mode, ResizeMode::ScalePercent(0.5));
    }
}
