use crate::renderer::Vertex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(f32, f32, f32);

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color(r, g, b)
    }

    pub const fn r(&self) -> f32 {
        self.0
    }

    pub const fn g(&self) -> f32 {
        self.1
    }

    pub const fn b(&self) -> f32 {
        self.2
    }

    pub const fn rgb(&self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }
}

pub const RED: Color = Color::new(0.749, 0.184, 0.184);
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

// Upper edge of each stripe, then the lower edge of the last one.
pub const STRIPE_EDGES: [f32; 4] = [1.0, 0.333, -0.333, -1.0];
pub const STRIPE_COLORS: [Color; 3] = [RED, WHITE, RED];

const fn stripe(top: f32, bottom: f32, color: Color) -> [Vertex; 4] {
    let rgb = color.rgb();
    [
        Vertex::new(-1.0, top, rgb),
        Vertex::new(1.0, top, rgb),
        Vertex::new(-1.0, bottom, rgb),
        Vertex::new(1.0, bottom, rgb),
    ]
}

const TOP: [Vertex; 4] = stripe(STRIPE_EDGES[0], STRIPE_EDGES[1], STRIPE_COLORS[0]);
const MIDDLE: [Vertex; 4] = stripe(STRIPE_EDGES[1], STRIPE_EDGES[2], STRIPE_COLORS[1]);
const BOTTOM: [Vertex; 4] = stripe(STRIPE_EDGES[2], STRIPE_EDGES[3], STRIPE_COLORS[2]);

#[rustfmt::skip]
pub static FLAG_VERTICES: [Vertex; 12] = [
    TOP[0], TOP[1], TOP[2], TOP[3],
    MIDDLE[0], MIDDLE[1], MIDDLE[2], MIDDLE[3],
    BOTTOM[0], BOTTOM[1], BOTTOM[2], BOTTOM[3],
];

#[rustfmt::skip]
pub static FLAG_INDICES: [u32; 18] = [
    0, 1, 2, 1, 2, 3,
    4, 5, 6, 5, 6, 7,
    8, 9, 10, 9, 10, 11,
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn triangles() -> impl Iterator<Item = [Vertex; 3]> {
        FLAG_INDICES.chunks(3).map(|tri| {
            [
                FLAG_VERTICES[tri[0] as usize],
                FLAG_VERTICES[tri[1] as usize],
                FLAG_VERTICES[tri[2] as usize],
            ]
        })
    }

    fn area([a, b, c]: [Vertex; 3]) -> f32 {
        let (ab, ac) = (
            [b.a_Pos[0] - a.a_Pos[0], b.a_Pos[1] - a.a_Pos[1]],
            [c.a_Pos[0] - a.a_Pos[0], c.a_Pos[1] - a.a_Pos[1]],
        );
        (ab[0] * ac[1] - ab[1] * ac[0]).abs() / 2.0
    }

    #[test]
    fn colors_match_flag() {
        assert_eq!((RED.r(), RED.g(), RED.b()), (0.749, 0.184, 0.184));
        assert_eq!(WHITE.rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn stripes_have_equal_height() {
        let heights: Vec<f32> = STRIPE_EDGES.windows(2).map(|w| w[0] - w[1]).collect();
        assert_eq!(heights.len(), 3);
        for height in &heights {
            assert_abs_diff_eq!(*height, 2.0 / 3.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn two_triangles_cover_each_stripe() {
        let tris: Vec<_> = triangles().collect();
        assert_eq!(tris.len(), 6);

        for (k, pair) in tris.chunks(2).enumerate() {
            let (top, bottom) = (STRIPE_EDGES[k], STRIPE_EDGES[k + 1]);
            let covered: f32 = pair.iter().map(|tri| area(*tri)).sum();
            assert_abs_diff_eq!(covered, 2.0 * (top - bottom), epsilon = 1e-5);

            for vertex in pair.iter().flatten() {
                assert!(vertex.a_Pos[1] == top || vertex.a_Pos[1] == bottom);
                assert!(vertex.a_Pos[0] == -1.0 || vertex.a_Pos[0] == 1.0);
                assert_eq!(vertex.a_Color, STRIPE_COLORS[k].rgb());
            }
        }
    }

    #[test]
    fn triangles_are_not_degenerate() {
        for tri in triangles() {
            assert!(area(tri) > 0.0);
        }
    }

    #[test]
    fn indices_stay_inside_their_stripe() {
        for (i, index) in FLAG_INDICES.iter().enumerate() {
            assert!((*index as usize) < FLAG_VERTICES.len());
            assert_eq!(*index as usize / 4, i / 6);
        }
    }
}
