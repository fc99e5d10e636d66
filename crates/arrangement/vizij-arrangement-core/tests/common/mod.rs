#![allow(dead_code)]
//! Shared test host: an in-memory board of elements keyed by u32.

use std::collections::HashMap;

use vizij_arrangement_core::{ElementHost, ElementMetrics, ElementTransform};

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[derive(Debug, Default)]
pub struct Board {
    pub transforms: HashMap<u32, ElementTransform>,
    pub metrics: HashMap<u32, ElementMetrics>,
    pub attached: Vec<u32>,
    pub detached: Vec<u32>,
    /// Notifications in the order the arrangement fired them.
    pub log: Vec<String>,
}

impl Board {
    /// Board with `n` elements keyed 0..n at the origin.
    pub fn with_elements(n: u32) -> Self {
        let mut board = Board::default();
        for key in 0..n {
            board.transforms.insert(key, ElementTransform::IDENTITY);
            board.metrics.insert(key, ElementMetrics::default());
        }
        board
    }

    pub fn keys(&self) -> Vec<u32> {
        let mut keys: Vec<u32> = self.transforms.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn position(&self, key: u32) -> glam::Vec3 {
        self.transforms[&key].position
    }
}

impl ElementHost<u32> for Board {
    fn transform(&self, key: u32) -> Option<ElementTransform> {
        self.transforms.get(&key).copied()
    }

    fn set_transform(&mut self, key: u32, transform: ElementTransform) {
        self.transforms.insert(key, transform);
    }

    fn metrics(&self, key: u32) -> ElementMetrics {
        self.metrics.get(&key).copied().unwrap_or_default()
    }

    fn attach(&mut self, key: u32) {
        self.attached.push(key);
    }

    fn detach(&mut self, key: u32) {
        self.detached.push(key);
    }

    fn arrange_started(&mut self, key: u32) {
        self.log.push(format!("start:{key}"));
    }

    fn arrange_ended(&mut self, key: u32) {
        self.log.push(format!("end:{key}"));
    }
}
