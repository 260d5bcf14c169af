//! Shared movement contract for everything that moves

use glam::Vec2;

/// An entity with a position advanced by a per-frame velocity
pub trait Kinematic {
    fn position(&self) -> Vec2;
    fn position_mut(&mut self) -> &mut Vec2;
    fn velocity(&self) -> Vec2;

    /// Apply one frame of motion
    #[inline]
    fn advance(&mut self) {
        let vel = self.velocity();
        *self.position_mut() += vel;
    }
}

/// Implement `Kinematic` for a struct with `pos` and `vel` fields
macro_rules! impl_kinematic {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::sim::kinematics::Kinematic for $ty {
                #[inline]
                fn position(&self) -> glam::Vec2 {
                    self.pos
                }
                #[inline]
                fn position_mut(&mut self) -> &mut glam::Vec2 {
                    &mut self.pos
                }
                #[inline]
                fn velocity(&self) -> glam::Vec2 {
                    self.vel
                }
            }
        )+
    };
}

pub(crate) use impl_kinematic;
