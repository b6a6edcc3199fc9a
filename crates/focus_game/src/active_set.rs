//! Elements that receive per-frame updates

/// Something the host loop drives every frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveElement {
    /// A scene, by name
    Scene(String),
    /// A level, by name
    Level(String),
}

/// The set of updated elements plus the application's stop flag
#[derive(Clone, Debug, Default)]
pub struct ActiveSet {
    elements: Vec<ActiveElement>,
    stopped: bool,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element; adding an element twice is a no-op
    pub fn add(&mut self, element: ActiveElement) {
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
    }

    /// Remove an element; returns whether it was present
    pub fn remove(&mut self, element: &ActiveElement) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e != element);
        self.elements.len() != before
    }

    pub fn contains(&self, element: &ActiveElement) -> bool {
        self.elements.contains(element)
    }

    pub fn elements(&self) -> &[ActiveElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Request the application to stop
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut set = ActiveSet::new();
        let scene = ActiveElement::Scene("level1".into());
        set.add(scene.clone());
        set.add(scene.clone());
        assert_eq!(set.len(), 1);
        assert!(set.contains(&scene));
        assert!(set.remove(&scene));
        assert!(!set.remove(&scene));
        assert!(set.is_empty());
    }

    #[test]
    fn test_stop_is_sticky() {
        let mut set = ActiveSet::new();
        assert!(!set.is_stopped());
        set.stop();
        set.stop();
        assert!(set.is_stopped());
    }
}
