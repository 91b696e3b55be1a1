use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::shadow::MAX_SHADOW_CASCADES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadowDepthFormat {
    #[default]
    Depth32Float,
    Depth24Plus,
}

impl ShadowDepthFormat {
    pub fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            ShadowDepthFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
            ShadowDepthFormat::Depth24Plus => wgpu::TextureFormat::Depth24Plus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadowFilter {
    Nearest,
    #[default]
    Linear,
}

impl ShadowFilter {
    pub fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            ShadowFilter::Nearest => wgpu::FilterMode::Nearest,
            ShadowFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadowAddressMode {
    ClampToEdge,
    #[default]
    ClampToBorder,
}

impl ShadowAddressMode {
    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            ShadowAddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            ShadowAddressMode::ClampToBorder => wgpu::AddressMode::ClampToBorder,
        }
    }
}

/// Border depth sampled outside the shadow map; white reads as "fully lit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadowBorderColor {
    #[default]
    OpaqueWhite,
    OpaqueBlack,
    TransparentBlack,
}

impl ShadowBorderColor {
    pub fn to_wgpu(self) -> wgpu::SamplerBorderColor {
        match self {
            ShadowBorderColor::OpaqueWhite => wgpu::SamplerBorderColor::OpaqueWhite,
            ShadowBorderColor::OpaqueBlack => wgpu::SamplerBorderColor::OpaqueBlack,
            ShadowBorderColor::TransparentBlack => wgpu::SamplerBorderColor::TransparentBlack,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShadowSettings {
    #[serde(default = "ShadowSettings::default_cascade_count")]
    pub cascade_count: u32,
    #[serde(default = "ShadowSettings::default_resolution")]
    pub width: u32,
    #[serde(default = "ShadowSettings::default_resolution")]
    pub height: u32,
    #[serde(default)]
    pub format: ShadowDepthFormat,
    #[serde(default)]
    pub filter: ShadowFilter,
    #[serde(default)]
    pub address_mode: ShadowAddressMode,
    #[serde(default)]
    pub border_color: ShadowBorderColor,
    #[serde(default = "ShadowSettings::default_z_multiplier")]
    pub z_multiplier: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            cascade_count: Self::default_cascade_count(),
            width: Self::default_resolution(),
            height: Self::default_resolution(),
            format: ShadowDepthFormat::default(),
            filter: ShadowFilter::default(),
            address_mode: ShadowAddressMode::default(),
            border_color: ShadowBorderColor::default(),
            z_multiplier: Self::default_z_multiplier(),
        }
    }
}

impl ShadowSettings {
    const fn default_cascade_count() -> u32 {
        3
    }

    const fn default_resolution() -> u32 {
        2048
    }

    const fn default_z_multiplier() -> f32 {
        10.0
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read shadow settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse shadow settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cascade_count == 0 || self.cascade_count as usize > MAX_SHADOW_CASCADES {
            bail!(
                "shadow cascade_count must be in 1..={}, got {}",
                MAX_SHADOW_CASCADES,
                self.cascade_count
            );
        }
        if self.width == 0 || self.height == 0 {
            bail!("shadow map dimensions must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.z_multiplier < 1.0 || !self.z_multiplier.is_finite() {
            bail!("shadow z_multiplier must be a finite value >= 1.0, got {}", self.z_multiplier);
        }
        Ok(())
    }
}
