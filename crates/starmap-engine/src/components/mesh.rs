use glam::Vec3;

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a 0xRRGGBB literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f32 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f32 / 255.0,
            b: (rgb & 0xFF) as f32 / 255.0,
        }
    }
}

/// Shape data owned by a geometry slot.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDesc {
    Sphere { radius: f32, segments: u32 },
    /// Flat annulus in the local XY plane.
    Ring { inner: f32, outer: f32, segments: u32 },
    /// Point cloud; positions are local to the owning object.
    Points { positions: Vec<Vec3> },
}

impl GeometryDesc {
    pub fn sphere(radius: f32, segments: u32) -> Self {
        Self::Sphere { radius, segments }
    }

    pub fn ring(inner: f32, outer: f32, segments: u32) -> Self {
        Self::Ring { inner, outer, segments }
    }

    /// Bounding radius around the local origin.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            GeometryDesc::Sphere { radius, .. } => *radius,
            GeometryDesc::Ring { outer, .. } => *outer,
            GeometryDesc::Points { positions } => positions
                .iter()
                .map(|p| p.length())
                .fold(0.0, f32::max),
        }
    }
}

/// How a material composites with what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Opaque = 0,
    Alpha = 1,
    Additive = 2,
}

/// Surface description owned by a material slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    /// Point size for point clouds; ignored by meshes.
    pub point_size: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            blend: BlendMode::Opaque,
            point_size: 1.0,
        }
    }
}

impl MaterialDesc {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    /// Translucent with the given blend mode.
    pub fn with_opacity(mut self, opacity: f32, blend: BlendMode) -> Self {
        self.opacity = opacity;
        self.blend = blend;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }
}
