//! Entity color assignment for chart legends
//!
//! Colors follow the golden-angle hue sequence so that consecutive entities
//! land far apart on the color wheel. A registry is owned by a single chart
//! build; colors are stable across renders only when the caller supplies the
//! same entities in the same order.

use std::collections::{BTreeMap, HashMap};

use crate::config::ColorConfig;

/// Hue step between consecutive entities, in degrees
pub const GOLDEN_ANGLE: f64 = 137.508;

/// Hue assigned to the entity at `index`
pub fn golden_angle_hue(index: usize) -> f64 {
    (index as f64 * GOLDEN_ANGLE).rem_euclid(360.0)
}

/// Deterministic id → color mapping, in insertion order
#[derive(Debug, Clone)]
pub struct EntityColorRegistry {
    saturation: u8,
    lightness: u8,
    assigned: HashMap<String, String>,
    order: Vec<String>,
}

impl EntityColorRegistry {
    pub fn new(config: &ColorConfig) -> Self {
        Self {
            saturation: config.saturation,
            lightness: config.lightness,
            assigned: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry pre-seeded with `ids`, in order
    pub fn from_entities<I, S>(config: &ColorConfig, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new(config);
        for id in ids {
            registry.get_color(id.as_ref());
        }
        registry
    }

    /// Color of `entity_id`, assigning the next one in the sequence on first use
    pub fn get_color(&mut self, entity_id: &str) -> String {
        if let Some(color) = self.assigned.get(entity_id) {
            return color.clone();
        }

        let color = self.hsl(golden_angle_hue(self.order.len()));
        self.assigned.insert(entity_id.to_string(), color.clone());
        self.order.push(entity_id.to_string());
        color
    }

    /// Current assignments, for merging into chart data
    pub fn get_map(&self) -> BTreeMap<String, String> {
        self.assigned
            .iter()
            .map(|(id, color)| (id.clone(), color.clone()))
            .collect()
    }

    /// Ids in the order they were assigned a color
    pub fn entities(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn hsl(&self, hue: f64) -> String {
        format!(
            "hsl({:.1}, {}%, {}%)",
            hue, self.saturation, self.lightness
        )
    }
}

impl Default for EntityColorRegistry {
    fn default() -> Self {
        Self::new(&ColorConfig::default())
    }
}
