use std::fmt;
use std::str::FromStr;

/// Primitive topology for the frame's single draw call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub const ALL: [PrimitiveMode; 7] = [
        PrimitiveMode::Points,
        PrimitiveMode::Lines,
        PrimitiveMode::LineStrip,
        PrimitiveMode::LineLoop,
        PrimitiveMode::Triangles,
        PrimitiveMode::TriangleStrip,
        PrimitiveMode::TriangleFan,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveMode::Points => "points",
            PrimitiveMode::Lines => "lines",
            PrimitiveMode::LineStrip => "line-strip",
            PrimitiveMode::LineLoop => "line-loop",
            PrimitiveMode::Triangles => "triangles",
            PrimitiveMode::TriangleStrip => "triangle-strip",
            PrimitiveMode::TriangleFan => "triangle-fan",
        }
    }

    /// Next mode in [`PrimitiveMode::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PrimitiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown primitive mode `{0}`")]
pub struct ParsePrimitiveModeError(pub String);

impl FromStr for PrimitiveMode {
    type Err = ParsePrimitiveModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ParsePrimitiveModeError(s.to_string()))
    }
}

/// Usage hint passed along with vertex buffer uploads.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_every_mode() {
        let mut mode = PrimitiveMode::Points;
        for expected in PrimitiveMode::ALL.iter().skip(1) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
        assert_eq!(mode.next(), PrimitiveMode::Points);
    }

    #[test]
    fn parse_accepts_display_names_and_underscores() {
        assert_eq!("triangle_strip".parse::<PrimitiveMode>(), Ok(PrimitiveMode::TriangleStrip));
        assert_eq!("Lines".parse::<PrimitiveMode>(), Ok(PrimitiveMode::Lines));
        for mode in PrimitiveMode::ALL {
            assert_eq!(mode.to_string().parse::<PrimitiveMode>(), Ok(mode));
        }
    }

    #[test]
    fn parse_rejects_unknown_modes() {
        assert!("quads".parse::<PrimitiveMode>().is_err());
    }
}
