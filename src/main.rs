mod shared;
mod farm;
mod wallet;
mod market;
mod tasks;
mod leaderboard;
mod admin;
mod storage;
mod data;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Harvestboard".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // App state
        .init_state::<AppState>()
        // Shared resources
        .init_resource::<PlayerProfile>()
        .init_resource::<FarmGrid>()
        .init_resource::<ResourceLedger>()
        .init_resource::<TaskCatalog>()
        .init_resource::<TaskLog>()
        .init_resource::<MarketCatalog>()
        .init_resource::<Leaderboard>()
        .init_resource::<FarmStatsHistory>()
        .init_resource::<NotificationLog>()
        // Events
        .add_event::<CellActionEvent>()
        .add_event::<FertilizeEvent>()
        .add_event::<CellTransitionEvent>()
        .add_event::<CellActionRejectedEvent>()
        .add_event::<PointsAwardEvent>()
        .add_event::<CoinChangeEvent>()
        .add_event::<PurchaseEvent>()
        .add_event::<PurchaseCompletedEvent>()
        .add_event::<TaskCompletedEvent>()
        .add_event::<NotificationEvent>()
        .add_event::<ToastEvent>()
        .add_event::<ExportRequestEvent>()
        .add_event::<ImportRequestEvent>()
        .add_event::<ImportFileRequestEvent>()
        .add_event::<ResetRequestEvent>()
        .add_event::<AdminGrantResourceEvent>()
        .add_event::<AdminGrantPointsEvent>()
        // Domain plugins
        .add_plugins(farm::FarmPlugin)
        .add_plugins(wallet::WalletPlugin)
        .add_plugins(market::MarketPlugin)
        .add_plugins(tasks::TaskPlugin)
        .add_plugins(leaderboard::LeaderboardPlugin)
        .add_plugins(admin::AdminPlugin)
        .add_plugins(storage::StoragePlugin)
        .add_plugins(ui::UiPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
