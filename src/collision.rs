use crate::constants::GHOST_POINTS;
use crate::ghost::{Ghost, GhostId};
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    GhostEaten(GhostId),
    PlayerCaught,
}

/// Checks the player against each ghost in order. Agents touch when their
/// positions are closer than one cell. A scared ghost is eaten on the spot;
/// any other ghost ends the life, and nothing after it is looked at.
pub fn resolve(player: &mut Player, ghosts: &mut [Ghost], cell_size: i32) -> Vec<CollisionEvent> {
    let reach = i64::from(cell_size) * i64::from(cell_size);
    let mut events = Vec::new();
    for ghost in ghosts.iter_mut() {
        if player.position.distance_sq(ghost.position) >= reach {
            continue;
        }
        if ghost.is_scared() {
            player.score += GHOST_POINTS;
            ghost.reset_to_home();
            events.push(CollisionEvent::GhostEaten(ghost.id));
        } else {
            events.push(CollisionEvent::PlayerCaught);
            break;
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::mover::Position;

    const CS: i32 = 30;

    fn ghost(id: GhostId, x: i32, y: i32) -> Ghost {
        let home = Position::from_cell(Cell::new(10, 10), CS);
        let mut g = Ghost::new(id, home, home, 2);
        g.position = Position { x, y };
        g
    }

    #[test]
    fn distant_ghosts_are_ignored() {
        let mut player = Player::new(Position { x: 300, y: 450 }, 5);
        let mut ghosts = vec![ghost(GhostId::Blinky, 330, 450), ghost(GhostId::Pinky, 300, 480)];
        assert!(resolve(&mut player, &mut ghosts, CS).is_empty());
        assert_eq!(player.score, 0);
    }

    #[test]
    fn threshold_is_strictly_less_than_a_cell() {
        let mut player = Player::new(Position { x: 300, y: 450 }, 5);
        let mut ghosts = vec![ghost(GhostId::Blinky, 329, 450)];
        assert_eq!(
            resolve(&mut player, &mut ghosts, CS),
            vec![CollisionEvent::PlayerCaught]
        );
        // 18² + 24² = 30²: exactly one cell apart is not touching.
        let mut ghosts = vec![ghost(GhostId::Blinky, 318, 474)];
        assert!(resolve(&mut player, &mut ghosts, CS).is_empty());
    }

    #[test]
    fn scared_ghost_is_eaten_and_rehomed() {
        let mut player = Player::new(Position { x: 300, y: 450 }, 5);
        let mut ghosts = vec![ghost(GhostId::Clyde, 310, 450)];
        ghosts[0].scare(100);
        assert_eq!(
            resolve(&mut player, &mut ghosts, CS),
            vec![CollisionEvent::GhostEaten(GhostId::Clyde)]
        );
        assert_eq!(player.score, 200);
        assert_eq!(ghosts[0].position, Position { x: 300, y: 300 });
        assert!(!ghosts[0].is_scared());
    }

    #[test]
    fn first_catch_short_circuits() {
        let mut player = Player::new(Position { x: 300, y: 450 }, 5);
        let mut ghosts = vec![
            ghost(GhostId::Blinky, 305, 450),
            ghost(GhostId::Pinky, 295, 450),
            ghost(GhostId::Inky, 300, 455),
        ];
        ghosts[2].scare(100);
        assert_eq!(
            resolve(&mut player, &mut ghosts, CS),
            vec![CollisionEvent::PlayerCaught]
        );
        // The scared ghost behind the catch was never reached.
        assert!(ghosts[2].is_scared());
        assert_eq!(player.score, 0);
    }

    #[test]
    fn eaten_ghosts_before_a_catch_still_count() {
        let mut player = Player::new(Position { x: 300, y: 450 }, 5);
        let mut ghosts = vec![ghost(GhostId::Blinky, 305, 450), ghost(GhostId::Pinky, 295, 450)];
        ghosts[0].scare(100);
        assert_eq!(
            resolve(&mut player, &mut ghosts, CS),
            vec![
                CollisionEvent::GhostEaten(GhostId::Blinky),
                CollisionEvent::PlayerCaught
            ]
        );
        assert_eq!(player.score, 200);
    }
}
