use crate::token::Token;
use anyhow::Result;
use rand::distr::Uniform;
use rand::prelude::*;
use simulation_common::{angle_to_vec, clamp, Kind, SimParams, Vec2};
use std::f32::consts::TAU;

/// Places `amount_each` tokens of every kind.
///
/// Kind `i` is scattered over the `i`-th third of the circle, inside an annulus
/// between a quarter and half of the surface size around the surface center,
/// so the kinds start out segregated. Coordinates are floored to the integer
/// grid and then pulled inside the walls.
pub fn place_initial_tokens(params: &SimParams, rng: &mut StdRng) -> Result<Vec<Token>> {
    let size = params.surface_size;
    let half = size / 2.0;
    let sector = TAU / Kind::ALL.len() as f32;

    let unit_dist = Uniform::new(0.0f32, 1.0f32)?;
    let radial_dist = Uniform::new(size / 4.0, half)?;
    let speed_dist = Uniform::new_inclusive(params.min_speed, params.max_speed)?;

    let mut tokens = Vec::with_capacity(params.token_count());
    for kind in Kind::ALL {
        for _ in 0..params.amount_each {
            let theta = (rng.sample(unit_dist) + kind.index() as f32) * sector;
            let r = rng.sample(radial_dist);
            let offset = angle_to_vec(theta).scale(r);
            let position = Vec2::new(
                clamp(offset.x.floor() + half, params.radius, size - params.radius),
                clamp(offset.y.floor() + half, params.radius, size - params.radius),
            );
            let velocity = Vec2::new(
                signed_speed(rng, &speed_dist),
                signed_speed(rng, &speed_dist),
            );
            tokens.push(Token::new(kind, position, velocity));
        }
    }
    Ok(tokens)
}

fn signed_speed(rng: &mut StdRng, speed_dist: &Uniform<u32>) -> f32 {
    let magnitude = rng.sample(speed_dist) as f32;
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sector_of(position: Vec2, size: f32) -> usize {
        let angle = (position.y - size / 2.0).atan2(position.x - size / 2.0);
        let angle = if angle < 0.0 { angle + TAU } else { angle };
        (angle / (TAU / 3.0)) as usize
    }

    #[test]
    fn places_kinds_in_creation_order() {
        let params = SimParams::new(5, 800.0, 30.0);
        let tokens = place_initial_tokens(&params, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(tokens.len(), 15);
        let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds[..5].iter().all(|&k| k == Kind::Rock));
        assert!(kinds[5..10].iter().all(|&k| k == Kind::Scissors));
        assert!(kinds[10..].iter().all(|&k| k == Kind::Paper));
    }

    #[test]
    fn same_seed_same_layout() {
        let params = SimParams::new(10, 800.0, 30.0);
        let a = place_initial_tokens(&params, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = place_initial_tokens(&params, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn layout_respects_walls_and_speeds(seed in any::<u64>(), amount_each in 1u32..15) {
            let params = SimParams::new(amount_each, 800.0, 30.0);
            let tokens = place_initial_tokens(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(tokens.len(), params.token_count());

            for token in &tokens {
                prop_assert!(token.position.x >= 30.0 && token.position.x <= 770.0);
                prop_assert!(token.position.y >= 30.0 && token.position.y <= 770.0);
                prop_assert_eq!(token.position.x.fract(), 0.0);
                prop_assert_eq!(token.position.y.fract(), 0.0);

                for speed in [token.velocity.x, token.velocity.y] {
                    prop_assert!((3.0..=6.0).contains(&speed.abs()));
                    prop_assert_eq!(speed.fract(), 0.0);
                }
                prop_assert!(!token.just_bounced);
            }
        }

        #[test]
        fn most_tokens_start_in_their_own_sector(seed in any::<u64>()) {
            // Flooring and wall clamping can nudge a token across a sector
            // border, so only a clear majority is required.
            let params = SimParams::new(30, 800.0, 30.0);
            let tokens = place_initial_tokens(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
            let in_sector = tokens
                .iter()
                .filter(|t| sector_of(t.position, 800.0) == t.kind.index())
                .count();
            prop_assert!(in_sector * 10 >= tokens.len() * 8);
        }
    }
}
