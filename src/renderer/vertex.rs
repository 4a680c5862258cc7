use gfx_hal::{format as f, pso};
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
#[allow(non_snake_case)]
pub struct Vertex {
    pub a_Pos: [f32; 2],
    pub a_Color: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 3]) -> Self {
        Vertex {
            a_Pos: [x, y],
            a_Color: color,
        }
    }

    pub const STRIDE: u32 = mem::size_of::<Vertex>() as u32;

    pub fn attributes(binding: pso::BufferIndex) -> [pso::AttributeDesc; 2] {
        [
            pso::AttributeDesc {
                location: 0,
                binding,
                element: pso::Element {
                    format: f::Format::Rg32Sfloat,
                    offset: 0,
                },
            },
            pso::AttributeDesc {
                location: 1,
                binding,
                element: pso::Element {
                    format: f::Format::Rgb32Sfloat,
                    offset: mem::size_of::<[f32; 2]>() as u32,
                },
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_five_packed_floats() {
        assert_eq!(Vertex::STRIDE, 20);
        let attributes = Vertex::attributes(0);
        assert_eq!(attributes[0].element.offset, 0);
        assert_eq!(attributes[1].element.offset, 8);
    }
}
