//! Debug parameter panel.
//!
//! The stage owns one panel and hands it to the demo it runs; the demo
//! registers its parameters in a folder and reads them back each frame.
//! Tearing the demo down destroys the panel.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Float {
        value: f64,
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    Bool(bool),
}

#[derive(Debug, Default)]
pub struct DebugPanel {
    folders: BTreeMap<String, BTreeMap<String, Parameter>>,
    closed: bool,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bounded float. The initial value is clamped into range.
    pub fn add_float(&mut self, folder: &str, name: &str, value: f64, min: f64, max: f64) {
        self.insert(
            folder,
            name,
            Parameter::Float {
                value: value.clamp(min, max),
                min,
                max,
                step: None,
            },
        );
    }

    /// Register a float that snaps to multiples of `step` above `min`.
    pub fn add_stepped_float(
        &mut self,
        folder: &str,
        name: &str,
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    ) {
        self.insert(
            folder,
            name,
            Parameter::Float {
                value: snap(value, min, max, Some(step)),
                min,
                max,
                step: Some(step),
            },
        );
    }

    pub fn add_bool(&mut self, folder: &str, name: &str, value: bool) {
        self.insert(folder, name, Parameter::Bool(value));
    }

    /// Set a float parameter, clamped and snapped. Returns the stored value,
    /// or `None` if no such float exists.
    pub fn set_float(&mut self, folder: &str, name: &str, new_value: f64) -> Option<f64> {
        match self.folders.get_mut(folder)?.get_mut(name)? {
            Parameter::Float { value, min, max, step } => {
                *value = snap(new_value, *min, *max, *step);
                Some(*value)
            }
            Parameter::Bool(_) => None,
        }
    }

    pub fn set_bool(&mut self, folder: &str, name: &str, new_value: bool) -> bool {
        match self.folders.get_mut(folder).and_then(|f| f.get_mut(name)) {
            Some(Parameter::Bool(value)) => {
                *value = new_value;
                true
            }
            _ => false,
        }
    }

    pub fn float(&self, folder: &str, name: &str) -> Option<f64> {
        match self.folders.get(folder)?.get(name)? {
            Parameter::Float { value, .. } => Some(*value),
            Parameter::Bool(_) => None,
        }
    }

    pub fn bool(&self, folder: &str, name: &str) -> Option<bool> {
        match self.folders.get(folder)?.get(name)? {
            Parameter::Bool(value) => Some(*value),
            Parameter::Float { .. } => None,
        }
    }

    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drop every folder and parameter.
    pub fn destroy(&mut self) {
        self.folders.clear();
        self.closed = false;
    }

    fn insert(&mut self, folder: &str, name: &str, parameter: Parameter) {
        self.folders
            .entry(folder.to_string())
            .or_default()
            .insert(name.to_string(), parameter);
    }
}

fn snap(value: f64, min: f64, max: f64, step: Option<f64>) -> f64 {
    let value = match step {
        Some(step) if step > 0.0 => min + ((value - min) / step).round() * step,
        _ => value,
    };
    value.clamp(min, max)
}

impl fmt::Display for DebugPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (folder, parameters) in &self.folders {
            writeln!(f, "[{folder}]")?;
            for (name, parameter) in parameters {
                match parameter {
                    Parameter::Float { value, .. } => writeln!(f, "  {name} = {value:.3}")?,
                    Parameter::Bool(value) => writeln!(f, "  {name} = {value}")?,
                }
            }
        }
        Ok(())
    }
}
