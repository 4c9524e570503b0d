//! # Serde module for Sketch
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `Sketch`, enabled with the `with_serde` feature.
//!
//! `Sketch` is serialized as a tuple `(SketchConfig, Vec<u32>)` of its configuration and
//! its packed register words. Derived fields (precision and bias correction constant)
//! are recomputed on deserialization.
//!
//! Deserialization validates the configuration, the number of words and that no word
//! holds bits outside of its registers, so a decoded sketch upholds the same
//! invariants as one built through `add` and `merge`.
use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::config::SketchConfig;
use crate::registers::Registers;
use crate::sketch::Sketch;

impl Serialize for Sketch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(self.config())?;
        tup.serialize_element(self.registers().words())?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for Sketch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (config, words): (SketchConfig, Vec<u32>) = Deserialize::deserialize(deserializer)?;
        let registers = Registers::from_words(config.bucket_count, words).map_err(Error::custom)?;
        Sketch::from_registers(config, registers).map_err(Error::custom)
    }
}
