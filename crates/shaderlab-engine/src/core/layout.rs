use crate::attribute::AttributeId;
use crate::gl::Location;
use crate::vertex::Vertex;

const FLOAT_SIZE: u32 = std::mem::size_of::<f32>() as u32;

/// Placement of one attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeSlot {
    pub id: AttributeId,
    pub location: Location,
    pub components: u32,
    /// Offset from the start of a vertex, in floats.
    pub offset: u32,
}

impl AttributeSlot {
    #[inline]
    pub fn offset_bytes(&self) -> u32 {
        self.offset * FLOAT_SIZE
    }
}

/// Interleaved layout produced by a repack: slots in schema order, back to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    slots: Vec<AttributeSlot>,
    stride: u32,
}

impl VertexLayout {
    /// Appends a slot of `components` floats after the existing ones.
    pub fn push(&mut self, id: AttributeId, location: Location, components: u32) {
        self.slots.push(AttributeSlot { id, location, components, offset: self.stride });
        self.stride += components;
    }

    #[inline]
    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    /// Floats per vertex.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn stride_bytes(&self) -> u32 {
        self.stride * FLOAT_SIZE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_location(&self, location: Location) -> bool {
        self.slots.iter().any(|s| s.location == location)
    }

    /// Packs `vertices` row-major: for each vertex, every slot's components in slot order.
    ///
    /// A vertex missing a slot's attribute leaves those floats at zero.
    pub fn pack(&self, vertices: &[Vertex]) -> Vec<f32> {
        let stride = self.stride as usize;
        let mut packed = vec![0.0f32; stride * vertices.len()];

        for (row, vertex) in vertices.iter().enumerate() {
            let base = row * stride;
            for slot in &self.slots {
                let offset = base + slot.offset as usize;
                match vertex.get(slot.id) {
                    Some(value) if value.components().len() == slot.components as usize => {
                        value.write_to(&mut packed, offset);
                    }
                    Some(value) => log::warn!(
                        "vertex {row}: attribute {} holds a `{}`, expected {} components; left zeroed",
                        slot.id,
                        value.gl_type(),
                        slot.components
                    ),
                    None => log::warn!("vertex {row}: attribute {} missing; left zeroed", slot.id),
                }
            }
        }

        packed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeInfo;
    use crate::value::{GlType, GlVariable};

    fn vertex(values: &[(AttributeId, GlVariable)]) -> Vertex {
        let mut v = Vertex::new();
        for (id, value) in values {
            v.insert(*id, *value);
        }
        v
    }

    #[test]
    fn slots_are_laid_out_back_to_back() {
        let pos = AttributeInfo::new("position", GlType::VEC3);
        let uv = AttributeInfo::new("uv", GlType::VEC2);

        let mut layout = VertexLayout::default();
        layout.push(pos.id(), 0, 3);
        layout.push(uv.id(), 4, 2);

        assert_eq!(layout.stride(), 5);
        assert_eq!(layout.stride_bytes(), 20);
        assert_eq!(layout.slots()[1].offset, 3);
        assert_eq!(layout.slots()[1].offset_bytes(), 12);
        assert!(layout.contains_location(4));
        assert!(!layout.contains_location(1));
    }

    #[test]
    fn pack_interleaves_per_vertex() {
        let pos = AttributeInfo::new("position", GlType::VEC2);
        let w = AttributeInfo::new("weight", GlType::FLOAT);

        let mut layout = VertexLayout::default();
        layout.push(pos.id(), 0, 2);
        layout.push(w.id(), 1, 1);

        let vertices = [
            vertex(&[(pos.id(), GlVariable::Vec2([1.0, 2.0])), (w.id(), GlVariable::Scalar(0.5))]),
            vertex(&[(pos.id(), GlVariable::Vec2([3.0, 4.0])), (w.id(), GlVariable::Scalar(0.25))]),
        ];

        assert_eq!(layout.pack(&vertices), [1.0, 2.0, 0.5, 3.0, 4.0, 0.25]);
    }

    #[test]
    fn pack_zero_fills_missing_values() {
        let pos = AttributeInfo::new("position", GlType::VEC2);
        let mut layout = VertexLayout::default();
        layout.push(pos.id(), 0, 2);

        let packed = layout.pack(&[Vertex::new(), vertex(&[(pos.id(), GlVariable::Vec2([7.0, 8.0]))])]);
        assert_eq!(packed, [0.0, 0.0, 7.0, 8.0]);
    }

    #[test]
    fn empty_layout_packs_nothing() {
        let layout = VertexLayout::default();
        assert!(layout.pack(&[Vertex::new(), Vertex::new()]).is_empty());
    }
}
