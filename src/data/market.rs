//! Hard-coded marketplace listings.

use crate::shared::*;

fn listing(id: &str, kind: ResourceKind, pack_size: u32, price_coins: u32) -> MarketListing {
    MarketListing {
        id: id.to_string(),
        kind,
        pack_size,
        price_coins,
    }
}

pub fn populate_market(catalog: &mut MarketCatalog) {
    catalog.listings = vec![
        listing("seeds_small", ResourceKind::Seeds, 3, 30),
        listing("seeds_big", ResourceKind::Seeds, 10, 85),
        listing("water_small", ResourceKind::Water, 3, 20),
        listing("water_big", ResourceKind::Water, 10, 55),
        listing("tools_pack", ResourceKind::Tools, 2, 40),
        listing("fertilizer_pack", ResourceKind::Fertilizer, 2, 60),
    ];
}
