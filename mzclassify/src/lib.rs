// src/lib.rs
pub mod io {
    pub mod coefficients;
    pub mod features;
    pub mod samples;
}

pub mod config;
