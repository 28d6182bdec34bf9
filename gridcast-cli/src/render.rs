use gridcast_core::{DISPLAY_PERIODS, ForecastMeta, ForecastPeriod, WeatherSymbol, WorkflowState};

/// Heading for a lookup, 4 decimal places like map tooltips show.
pub fn heading(latitude: f64, longitude: f64) -> String {
    format!("Forecast for ({latitude:.4}, {longitude:.4})")
}

/// Render a workflow snapshot as terminal text. Total over all phases; an
/// idle snapshot renders as nothing.
pub fn state(state: &WorkflowState) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading forecast...\n");
    }

    if let Some(error) = &state.error {
        out.push_str(&format!("error ({}): {}\n", error.kind, error.message));
    }

    if state.success {
        out.push_str("Forecast retrieved.\n");
        if let Some(meta) = &state.meta {
            out.push_str(&meta_lines(meta));
        }
        for period in &state.periods {
            out.push('\n');
            out.push_str(&card(period));
        }
    }

    out
}

fn meta_lines(meta: &ForecastMeta) -> String {
    let mut out = String::new();

    out.push_str(&format!("Office: {}, Grid: ({}, {})\n", meta.office, meta.grid_x, meta.grid_y));
    if let Some(place) = &meta.relative_location {
        out.push_str(&format!("Near: {place}\n"));
    }
    out.push_str(&format!("{} forecast periods were found\n", meta.period_count));
    if meta.period_count > DISPLAY_PERIODS {
        out.push_str(&format!("Showing the first {DISPLAY_PERIODS}\n"));
    }

    out
}

fn card(period: &ForecastPeriod) -> String {
    let symbol = WeatherSymbol::classify(&period.short_forecast);
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", period.name, symbol.emoji()));
    out.push_str(&format!("  Temperature: {}°{}\n", period.temperature, period.temperature_unit));
    out.push_str(&format!("  Wind: {} {}\n", period.wind_speed, period.wind_direction));
    out.push_str(&format!("  Forecast: {}\n", period.short_forecast));

    out
}
