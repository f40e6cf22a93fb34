use bevy::prelude::*;
use chrono::{DateTime, Utc};

use crate::systems::FrameSet;
use crate::systems::bodies::BodyKind;
use crate::systems::focus::{FocusController, setup_reset_button};
use crate::systems::orbit::Orbit;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_hud, setup_reset_button))
           .add_systems(Update, (update_focus_label, update_datetime).in_set(FrameSet::Hud));
    }
}

// UI component to display the focused body and its speed
#[derive(Component)]
pub struct FocusLabel;

// UI component to display current datetime
#[derive(Component)]
pub struct DateTimeDisplay;

fn setup_hud(mut commands: Commands) {
    // create UI container
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Start,
                justify_content: JustifyContent::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            BackgroundColor(Color::NONE),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(focus_text(None)),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                FocusLabel,
            ));

            parent.spawn((
                Text::new("Time: Loading..."),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                DateTimeDisplay,
                Node {
                    margin: UiRect::top(Val::Px(5.0)), // spacing
                    ..default()
                },
            ));
        });
}

pub fn focus_text(focused: Option<(BodyKind, &Orbit)>) -> String {
    match focused {
        Some((kind, orbit)) => format!("{}: {:.0} km/h", kind.name(), orbit.speed_kmh()),
        None => "Free view".to_string(),
    }
}

pub fn datetime_text(now: DateTime<Utc>) -> String {
    format!("Time: {} UTC", now.format("%Y-%m-%d %H:%M:%S"))
}

fn update_focus_label(
    focus: Res<FocusController>,
    bodies: Query<(&BodyKind, &Orbit)>,
    mut text_query: Query<&mut Text, With<FocusLabel>>,
) {
    if !focus.is_changed() {
        return;
    }

    let focused = focus
        .focused_body()
        .and_then(|entity| bodies.get(entity).ok())
        .map(|(kind, orbit)| (*kind, orbit));

    if let Ok(mut text) = text_query.single_mut() {
        text.0 = focus_text(focused);
    }
}

// update the datetime display with current UTC time
fn update_datetime(
    mut text_query: Query<&mut Text, With<DateTimeDisplay>>,
) {
    if let Ok(mut text) = text_query.single_mut() {
        text.0 = datetime_text(Utc::now());
    }
}
