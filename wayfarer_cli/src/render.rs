use comfy_table::{Table, presets::UTF8_FULL};
use jiff::{Timestamp, tz::TimeZone};
use wayfarer_core::{Coordinate, Place};
use wayfarer_navigation::{
    Notice, NoticeLevel, NavigationView, RouteSummary,
    view::{format_delta, format_distance},
};

/// Search results, with the straight-line distance from `from` when known.
pub fn places_table(places: &[Place], from: Option<Coordinate>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Address", "Away", "Coordinates"]);

    for (index, place) in places.iter().enumerate() {
        let away = from
            .map(|from| format_distance(from.haversine_distance(&place.coordinates)))
            .unwrap_or_else(|| String::from("-"));

        table.add_row(vec![
            (index + 1).to_string(),
            place.name.clone(),
            place.address.clone().unwrap_or_default(),
            away,
            place.coordinates.to_string(),
        ]);
    }

    table
}

pub fn candidates_table(view: &NavigationView) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "", "Distance", "Duration", "ETA", "vs current"]);

    for candidate in &view.candidates {
        let marker = match (candidate.is_current, candidate.is_selected) {
            (true, true) => "current *",
            (true, false) => "current",
            (false, true) => "*",
            (false, false) => "",
        };

        let delta = if candidate.is_current {
            String::new()
        } else {
            format!(
                "{} / {}",
                format_delta(candidate.distance_delta),
                format_delta(candidate.duration_delta)
            )
        };

        table.add_row(vec![
            candidate.index.to_string(),
            marker.to_string(),
            candidate.summary.distance_text.clone(),
            candidate.summary.duration_text.clone(),
            format_eta(candidate.summary.eta),
            delta,
        ]);
    }

    table
}

pub fn route_line(summary: &RouteSummary) -> String {
    format!(
        "{}, {} (arrive {}, {} steps)",
        summary.distance_text,
        summary.duration_text,
        format_eta(summary.eta),
        summary.steps
    )
}

pub fn print_view(view: &NavigationView) {
    if let Some(banner) = &view.banner {
        println!("!! {}", banner);
    }

    println!("[{}]", view.state);

    if let Some(destination) = &view.destination {
        println!("To: {}", destination);
    }

    if let Some(route) = &view.route {
        println!("Route: {}", route_line(route));
        if !view.avoid.is_empty() {
            println!("Avoiding: {}", view.avoid.join(", "));
        }
        println!("Profile: {}", view.profile);
    }

    if let Some(position) = view.position {
        println!("Position: {}", position);
    }

    if !view.candidates.is_empty() {
        println!("{}", candidates_table(view));
        println!("`select <n>` to preview, `confirm [n]` to switch, `keep` to stay.");
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let prefix = match notice.level {
            NoticeLevel::Info => "",
            NoticeLevel::Warning => "warning: ",
            NoticeLevel::Error => "error: ",
            NoticeLevel::Persistent => "!! ",
        };
        println!("{}{}", prefix, notice);
    }
}

fn format_eta(eta: Option<Timestamp>) -> String {
    eta.map(|eta| eta.to_zoned(TimeZone::system()).strftime("%H:%M").to_string())
        .unwrap_or_else(|| String::from("-"))
}
