//! Capabilities shared by everything that occupies the lawn.

/// Common read surface of plants, tombstones and zombies.
pub trait Entity {
    /// Remaining health. The entity is removed once this reaches zero.
    fn health(&self) -> u32;

    /// Damage the entity deals when it attacks.
    fn damage(&self) -> u32;

    /// Lane the entity occupies.
    fn row(&self) -> u32;

    /// Column position. Grid occupants report whole numbers.
    fn col(&self) -> f32;

    /// Whether the entity still has health left.
    fn is_alive(&self) -> bool {
        self.health() > 0
    }
}
