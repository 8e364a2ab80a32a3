pub const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Map search link for a location, qualified by city.
pub fn map_search_url(location: &str, city: &str) -> String {
    let query = location.trim().replace(' ', "+");
    if city.is_empty() {
        format!("{}{}", MAPS_SEARCH_BASE, query)
    } else {
        format!("{}{}+{}", MAPS_SEARCH_BASE, query, city.replace(' ', "+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_search_url() {
        assert_eq!(
            map_search_url("Baner Road", "Pune"),
            "https://www.google.com/maps/search/Baner+Road+Pune"
        );
        assert_eq!(map_search_url("Aundh", "Pune"), "https://www.google.com/maps/search/Aundh+Pune");
    }

    #[test]
    fn test_map_search_url_without_city() {
        assert_eq!(map_search_url("Aundh", ""), "https://www.google.com/maps/search/Aundh");
    }
}
