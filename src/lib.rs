// lib.rs

pub mod featurestore;
