use serde::{Deserialize, Serialize};
use simulation_common::{Kind, TokenView, Vec2};

/// One moving body on the surface.
///
/// The radius is a simulation-wide parameter and is passed in where needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: Kind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set when an axis flipped during the current step's wall phase.
    /// Keeps a token in a corner from flipping both axes in one step.
    pub just_bounced: bool,
}

impl Token {
    pub fn new(kind: Kind, position: Vec2, velocity: Vec2) -> Self {
        Self { kind, position, velocity, just_bounced: false }
    }

    pub fn center(&self) -> Vec2 {
        self.position
    }

    /// Moves the token by one step of its velocity, bouncing off the walls of a
    /// square surface of side `surface_size`.
    ///
    /// An axis flips when the tentative position would put the token's edge at
    /// or beyond a wall it is heading towards. X is checked first; once an axis
    /// has flipped the other is left alone until the next step.
    /// Returns true if the token bounced.
    pub fn advance(&mut self, surface_size: f32, radius: f32) -> bool {
        self.just_bounced = false;
        let tentative = self.position + self.velocity;

        if hits_wall(tentative.x, self.velocity.x, surface_size, radius) {
            self.velocity.x = -self.velocity.x;
            self.just_bounced = true;
        }
        if !self.just_bounced && hits_wall(tentative.y, self.velocity.y, surface_size, radius) {
            self.velocity.y = -self.velocity.y;
            self.just_bounced = true;
        }

        self.position = self.position + self.velocity;
        self.just_bounced
    }

    /// Full sign reversal of both velocity components.
    pub fn reverse(&mut self) {
        self.velocity = -self.velocity;
    }

    pub fn convert(&mut self, kind: Kind) {
        self.kind = kind;
    }

    /// Two tokens collide when their centers are within one radius.
    pub fn collides_with(&self, other: &Token, radius: f32) -> bool {
        self.center().distance(other.center()) <= radius
    }

    pub fn view(&self, radius: f32) -> TokenView {
        TokenView { kind: self.kind, position: self.position, radius }
    }
}

// Only walls the token is moving towards count, so a token already heading
// back inside is never turned around again.
fn hits_wall(coord: f32, speed: f32, surface_size: f32, radius: f32) -> bool {
    (speed < 0.0 && coord - radius <= 0.0) || (speed > 0.0 && coord + radius >= surface_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 500.0;
    const RADIUS: f32 = 10.0;

    fn token(x: f32, y: f32, vx: f32, vy: f32) -> Token {
        Token::new(Kind::Rock, Vec2::new(x, y), Vec2::new(vx, vy))
    }

    #[test]
    fn moves_freely_inside_the_surface() {
        let mut t = token(100.0, 100.0, 3.0, -4.0);
        assert!(!t.advance(SIZE, RADIUS));
        assert_eq!(t.position, Vec2::new(103.0, 96.0));
        assert_eq!(t.velocity, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn bounces_off_left_wall() {
        let mut t = token(RADIUS - 1.0, 50.0, -5.0, 2.0);
        assert!(t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity, Vec2::new(5.0, 2.0));
        assert_eq!(t.position, Vec2::new(RADIUS + 4.0, 52.0));
    }

    #[test]
    fn bounces_off_far_wall_before_crossing_it() {
        let mut t = token(SIZE - RADIUS - 2.0, 200.0, 6.0, 0.0);
        assert!(t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity.x, -6.0);
        assert_eq!(t.position.x, SIZE - RADIUS - 8.0);
    }

    #[test]
    fn bounces_off_top_and_bottom() {
        let mut t = token(200.0, RADIUS + 1.0, 0.0, -3.0);
        assert!(t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity.y, 3.0);

        let mut t = token(200.0, SIZE - RADIUS, 1.0, 3.0);
        assert!(t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity, Vec2::new(1.0, -3.0));
    }

    #[test]
    fn corner_flips_x_only() {
        let mut t = token(RADIUS + 1.0, RADIUS + 1.0, -4.0, -4.0);
        assert!(t.advance(SIZE, RADIUS));
        assert!(t.just_bounced);
        assert_eq!(t.velocity, Vec2::new(4.0, -4.0));

        // Next step the latch is clear and Y gets its turn.
        assert!(t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn outside_token_heading_inwards_keeps_its_velocity() {
        let mut t = token(RADIUS - 3.0, 100.0, 5.0, 0.0);
        assert!(!t.advance(SIZE, RADIUS));
        assert_eq!(t.velocity.x, 5.0);
        assert_eq!(t.position.x, RADIUS + 2.0);
    }

    #[test]
    fn latch_resets_each_step() {
        let mut t = token(RADIUS + 1.0, 100.0, -4.0, 1.0);
        assert!(t.advance(SIZE, RADIUS));
        assert!(!t.advance(SIZE, RADIUS));
        assert!(!t.just_bounced);
    }

    #[test]
    fn collision_threshold_is_one_radius() {
        let a = token(100.0, 100.0, 0.0, 0.0);
        assert!(a.collides_with(&token(100.0, 100.0, 0.0, 0.0), RADIUS));
        assert!(a.collides_with(&token(106.0, 108.0, 0.0, 0.0), RADIUS));
        assert!(!a.collides_with(&token(106.0, 108.5, 0.0, 0.0), RADIUS));
    }

    #[test]
    fn reverse_and_convert() {
        let mut t = token(1.0, 2.0, 3.0, -4.0);
        t.reverse();
        assert_eq!(t.velocity, Vec2::new(-3.0, 4.0));
        t.convert(Kind::Paper);
        assert_eq!(t.kind, Kind::Paper);
        assert_eq!(t.view(7.0).kind, Kind::Paper);
        assert_eq!(t.view(7.0).radius, 7.0);
    }
}
