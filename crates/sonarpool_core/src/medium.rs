use sonarpool_data::Medium;

/// Presentation and acoustic traits of a cell medium.
pub trait MediumLogic {
    /// Whether sound travels through a cell of this medium.
    fn carries_sound(&self) -> bool;
    fn symbol(&self) -> char;
}

impl MediumLogic for Medium {
    fn carries_sound(&self) -> bool {
        matches!(self, Medium::Water | Medium::Source)
    }

    fn symbol(&self) -> char {
        match self {
            Medium::Water => '~',
            Medium::Terrain => '#',
            Medium::Source => '*',
        }
    }
}
