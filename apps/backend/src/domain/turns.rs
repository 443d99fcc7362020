//! Pure turn-transition functions over the game state.
//!
//! These rewrite permission flags on every transition; the flags are always
//! derivable from the phase plus whose turn it is, never set ad hoc.

use super::state::{Game, Phase, PlayerId};

/// Rotate the turn to the next eligible seat and rewrite its permissions.
///
/// Eligibility is alive (non-spectator, lives > 0) in seat order, wrapping
/// circularly. A current player who is absent from the eligible list (just
/// removed or just eliminated) restarts the rotation from the front.
pub fn advance_turn(game: &mut Game) {
    let eligible = game.eligible_ids();
    if eligible.is_empty() {
        return;
    }
    let next = match game
        .current_player
        .and_then(|id| eligible.iter().position(|&e| e == id))
    {
        Some(i) => eligible[(i + 1) % eligible.len()],
        None => eligible[0],
    };

    game.current_player = Some(next);
    game.drawn_this_turn = false;

    let pre_knock = game.phase == Phase::PreKnock;
    let knock_active = game.phase == Phase::KnockActive;
    let knocker = game.knocker;
    if let Some(player) = game.player_mut(next) {
        player.turn_count += 1;
        player.can_draw = true;
        player.can_discard = false;
        player.can_knock = pre_knock;
        player.is_knockee = knock_active && Some(next) != knocker;
    }
}

/// After a draw (from either pile) the player holds four cards and must
/// discard; no further draw or knock this turn.
pub fn after_draw(game: &mut Game, id: PlayerId) {
    game.drawn_this_turn = true;
    if let Some(player) = game.player_mut(id) {
        player.can_draw = false;
        player.can_discard = true;
        player.can_knock = false;
    }
}

/// Keeping the peeked card is a draw for permission purposes.
pub fn after_keep(game: &mut Game, id: PlayerId) {
    after_draw(game, id);
}

/// The forced redraw that follows a burn leaves the same obligations as a
/// draw.
pub fn after_burn(game: &mut Game, id: PlayerId) {
    after_draw(game, id);
}

/// The mandatory discard ends the turn; rotation continues.
pub fn after_discard(game: &mut Game) {
    if let Some(id) = game.current_player {
        if let Some(player) = game.player_mut(id) {
            player.can_discard = false;
        }
    }
    advance_turn(game);
}

/// Record a knock: freeze the knocker's hand and flag every other eligible
/// player as a knockee. The caller advances the turn afterwards.
pub fn after_knock(game: &mut Game, knocker: PlayerId) {
    game.knocker = Some(knocker);
    game.phase = Phase::KnockActive;
    for id in game.eligible_ids() {
        if id == knocker {
            continue;
        }
        if let Some(player) = game.player_mut(id) {
            player.is_knockee = true;
        }
    }
    if let Some(player) = game.player_mut(knocker) {
        player.clear_turn_flags();
    }
}
