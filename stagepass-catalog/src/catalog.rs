use chrono::NaiveDate;

use crate::event::Event;

/// The storefront's event lineup. Fixed at startup and never mutated.
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The lineup every storefront boots with.
    pub fn seeded() -> Self {
        Self::new(seed_events())
    }

    /// Every event, in catalog order.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: u32) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }
}

fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).expect("valid calendar date")
}

fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: 1,
            title: "Summer Jazz Festival".to_string(),
            date: day(2026, 7, 18),
            location: "Riverside Park, New Orleans".to_string(),
            price_cents: 45_00,
            thumbnail: "/images/summer-jazz-festival.jpg".to_string(),
            description: "Three stages of swing, bebop and fusion on the riverfront, \
                          headlined by the Delta Quarter Orchestra."
                .to_string(),
        },
        Event {
            id: 2,
            title: "Indie Rock Night".to_string(),
            date: day(2026, 6, 5),
            location: "The Fillmore, San Francisco".to_string(),
            price_cents: 35_00,
            thumbnail: "/images/indie-rock-night.jpg".to_string(),
            description: "Four up-and-coming bands share one loud, sweaty evening under \
                          the chandeliers."
                .to_string(),
        },
        Event {
            id: 3,
            title: "Electric Garden Carnival".to_string(),
            date: day(2026, 8, 29),
            location: "Brooklyn Mirage, New York".to_string(),
            price_cents: 89_00,
            thumbnail: "/images/electric-garden-carnival.jpg".to_string(),
            description: "An open-air electronic marathon from sunset to sunrise with \
                          immersive light installations."
                .to_string(),
        },
        Event {
            id: 4,
            title: "Beethoven's Ninth".to_string(),
            date: day(2026, 5, 30),
            location: "Symphony Hall, Boston".to_string(),
            price_cents: 65_00,
            thumbnail: "/images/beethovens-ninth.jpg".to_string(),
            description: "The full choral symphony performed by the city's philharmonic \
                          and a two-hundred-voice choir."
                .to_string(),
        },
        Event {
            id: 5,
            title: "Stand-Up Comedy Gala".to_string(),
            date: day(2026, 6, 21),
            location: "The Comedy Store, Los Angeles".to_string(),
            price_cents: 25_00,
            thumbnail: "/images/stand-up-comedy-gala.jpg".to_string(),
            description: "Eight comics, one night, no two-drink minimum.".to_string(),
        },
        Event {
            id: 6,
            title: "Blues & Brass Brunch".to_string(),
            date: day(2026, 6, 14),
            location: "Jazz Quarter, New Orleans".to_string(),
            price_cents: 30_00,
            thumbnail: "/images/blues-brass-brunch.jpg".to_string(),
            description: "A slow Sunday of horns, gumbo and bottomless chicory coffee."
                .to_string(),
        },
        Event {
            id: 7,
            title: "Open-Air Film Night".to_string(),
            date: day(2026, 7, 4),
            location: "Griffith Park, Los Angeles".to_string(),
            price_cents: 15_00,
            thumbnail: "/images/open-air-film-night.jpg".to_string(),
            description: "A double feature on the lawn. Bring a blanket; projection starts \
                          at dusk."
                .to_string(),
        },
        Event {
            id: 8,
            title: "Harvest Food & Wine Expo".to_string(),
            date: day(2026, 9, 12),
            location: "Navy Pier, Chicago".to_string(),
            price_cents: 55_00,
            thumbnail: "/images/harvest-food-wine-expo.jpg".to_string(),
            description: "Two hundred producers pouring and plating along the lakefront."
                .to_string(),
        },
    ]
}
