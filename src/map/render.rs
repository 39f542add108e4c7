use super::MapView;
use crate::asset::Asset;

/// Decimal places shown for coordinates (about one meter)
pub const LOCATION_DECIMALS: usize = 5;

/// Show the asset's location on the map, or clear the info text.
///
/// Safe to call repeatedly with the same asset; every call issues the same
/// view commands.
pub fn show_asset_on_map(view: &dyn MapView, asset: Option<&Asset>) {
    let Some((asset, coordinates)) = asset.and_then(|a| a.location().map(|c| (a, c))) else {
        view.show_info(None);
        return;
    };

    view.show_info(location_info(asset).as_deref());
    view.show_features_selection(&asset.to_feature());
    view.fly_to(coordinates);
}

/// Human-readable location, latitude first.
///
/// Only assets with a creation timestamp and exactly two coordinates have a
/// displayable location; anything else yields `None`.
pub fn location_info(asset: &Asset) -> Option<String> {
    asset.created_on?;
    match asset.location()? {
        [lng, lat] => Some(format!(
            "Location: {} {} Lat|Lng",
            round(*lat, LOCATION_DECIMALS),
            round(*lng, LOCATION_DECIMALS)
        )),
        _ => None,
    }
}

/// Round half-up to exactly `places` fraction digits.
///
/// Works on the shortest decimal representation of `value` (the digits
/// `format!("{}", value)` prints), so `round(1.005, 2)` is `"1.01"`. Ties
/// round away from zero and a zero result carries no sign.
pub fn round(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let frac: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    digits.extend(frac.iter().take(places));
    digits.resize(int_part.len() + places, 0);

    if frac.get(places).map_or(false, |&d| d >= 5) {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() && digits.iter().any(|&d| d != 0) {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| char::from(b'0' + d)));
    if places > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&d| char::from(b'0' + d)));
    }
    out
}
