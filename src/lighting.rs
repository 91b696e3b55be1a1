use glam::Vec3;

/// Phong-style color terms shared by every light kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for LightColors {
    fn default() -> Self {
        Self { ambient: Vec3::splat(0.1), diffuse: Vec3::ONE, specular: Vec3::ONE }
    }
}

/// Distance falloff terms for point/spot lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self { constant: 1.0, linear: 0.09, quadratic: 0.032 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional {
        direction: Vec3,
    },
    Point {
        position: Vec3,
        attenuation: Attenuation,
    },
    Spot {
        position: Vec3,
        direction: Vec3,
        cutoff_radians: f32,
        outer_cutoff_radians: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub colors: LightColors,
    pub kind: LightKind,
}

impl Light {
    pub fn directional(direction: Vec3) -> Self {
        Self { colors: LightColors::default(), kind: LightKind::Directional { direction } }
    }

    pub fn point(position: Vec3) -> Self {
        Self {
            colors: LightColors::default(),
            kind: LightKind::Point { position, attenuation: Attenuation::default() },
        }
    }

    pub fn spot(position: Vec3, direction: Vec3, cutoff_radians: f32, outer_cutoff_radians: f32) -> Self {
        Self {
            colors: LightColors::default(),
            kind: LightKind::Spot { position, direction, cutoff_radians, outer_cutoff_radians },
        }
    }

    /// Direction the cascade builder should fit against, if this light casts
    /// directional shadows. Point lights have no single shadow direction.
    pub fn shadow_direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { direction } | LightKind::Spot { direction, .. } => Some(direction),
            LightKind::Point { .. } => None,
        }
    }
}
