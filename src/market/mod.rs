//! Marketplace domain — coin-priced resource packs.

use bevy::prelude::*;
use crate::shared::*;

pub struct MarketPlugin;

impl Plugin for MarketPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_purchases.run_if(not(in_state(AppState::Loading))),
        );
    }
}

/// Process purchase requests: validate the coin balance, debit coins via
/// the wallet, credit the resource ledger, and announce the result.
/// Insufficient coins reject the purchase with a toast and change nothing.
pub fn handle_purchases(
    mut purchase_events: EventReader<PurchaseEvent>,
    catalog: Res<MarketCatalog>,
    profile: Res<PlayerProfile>,
    mut ledger: ResMut<ResourceLedger>,
    mut coin_events: EventWriter<CoinChangeEvent>,
    mut completed_events: EventWriter<PurchaseCompletedEvent>,
    mut toast_events: EventWriter<ToastEvent>,
) {
    // Track spending within this batch so two purchases in one frame
    // can't both pass the same balance check.
    let mut available = profile.coins;

    for ev in purchase_events.read() {
        let Some(listing) = catalog.get(&ev.listing_id) else {
            warn!("[Market] Unknown listing '{}'", ev.listing_id);
            continue;
        };

        if available < listing.price_coins {
            toast_events.send(ToastEvent {
                message: String::from("Not enough coins"),
                duration_secs: 2.0,
            });
            continue;
        }
        available -= listing.price_coins;

        coin_events.send(CoinChangeEvent {
            amount: -(listing.price_coins as i64),
            reason: format!("Bought {} x{}", listing.kind.name(), listing.pack_size),
        });
        ledger.grant(listing.kind, listing.pack_size);

        info!(
            "[Market] Purchased {} x{} for {} coins",
            listing.kind.name(),
            listing.pack_size,
            listing.price_coins
        );
        completed_events.send(PurchaseCompletedEvent {
            listing_id: listing.id.clone(),
            kind: listing.kind,
            quantity: listing.pack_size,
        });
        toast_events.send(ToastEvent {
            message: format!("+{} {}", listing.pack_size, listing.kind.name()),
            duration_secs: 2.0,
        });
    }
}
