// data module
pub mod data {
    pub mod coefficient;
    pub mod feature;
    pub mod result;
}

// algorithm module
pub mod algorithm {
    pub mod matcher;
    pub mod scorer;
}
