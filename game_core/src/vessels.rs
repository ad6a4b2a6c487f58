/// A single fill target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vessel {
    pub capacity: f64,
    pub base: u32, // points for a hit before combo bonus
}

impl Vessel {
    pub const fn new(capacity: f64, base: u32) -> Self {
        Self { capacity, base }
    }

    /// Fill ceiling, past capacity so a miss is visible
    pub fn max_fill(&self) -> f64 {
        self.capacity * crate::Params::OVERFILL_FACTOR
    }
}

/// The vessel sequence shared by every difficulty
pub const VESSELS: [Vessel; 5] = [
    Vessel::new(20.0, 20),
    Vessel::new(40.0, 40),
    Vessel::new(60.0, 60),
    Vessel::new(80.0, 80),
    Vessel::new(100.0, 100),
];

/// Ordered vessels for one round
#[derive(Debug, Clone)]
pub struct VesselLine {
    vessels: Vec<Vessel>,
}

impl Default for VesselLine {
    fn default() -> Self {
        Self {
            vessels: VESSELS.to_vec(),
        }
    }
}

impl VesselLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom sequence; empty sequences are replaced by the standard one
    pub fn from_vessels(vessels: Vec<Vessel>) -> Self {
        if vessels.is_empty() {
            return Self::default();
        }
        Self { vessels }
    }

    pub fn get(&self, index: usize) -> Option<&Vessel> {
        self.vessels.get(index)
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.vessels.len()
    }
}
