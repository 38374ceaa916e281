// Ingestion limits for graph descriptions handed over by the assembly backend

pub const MAX_NODES: usize = 10_000;
pub const MAX_PORTS_PER_NODE: usize = 512;
pub const MAX_EDGES: usize = 50_000;

// Numeric bounds for node positions
pub const COORD_MIN: f32 = -1_000_000.0;
pub const COORD_MAX: f32 =  1_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
