use crate::models::{CropProfile, Season, SeasonFit};
use chrono::Month;

/// Sowing window a calendar month falls in.
///
/// Kharif runs June through October, Rabi November through April. May sits
/// between the two and belongs to neither.
pub fn sowing_window(month: Month) -> Option<Season> {
    match month.number_from_month() {
        6..=10 => Some(Season::Kharif),
        11 | 12 | 1..=4 => Some(Season::Rabi),
        _ => None,
    }
}

pub fn season_fit(profile: &CropProfile, month: Month) -> SeasonFit {
    let Some(window) = sowing_window(month) else {
        return SeasonFit::Fair;
    };

    match profile.primary_season() {
        Some(Season::Annual) => SeasonFit::Good,
        Some(primary) if primary == window => SeasonFit::Excellent,
        Some(_) => SeasonFit::Poor,
        None => SeasonFit::Fair,
    }
}

/// Month number (1-12) into a `chrono::Month`
pub fn month_from_number(number: u32) -> Option<Month> {
    u8::try_from(number)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
}
