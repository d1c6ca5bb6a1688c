use scout_core::RawResult;

struct Person {
    name: &'static str,
    slug: &'static str,
    headline: &'static str,
    company: &'static str,
    city: &'static str,
    about: &'static str,
}

const DIRECTORY: &[Person] = &[
    Person {
        name: "Ada Lovelace",
        slug: "ada-lovelace",
        headline: "Analyst",
        company: "Analytical Engines Ltd",
        city: "London",
        about: "Wrote the first published algorithm for a general-purpose machine.",
    },
    Person {
        name: "Grace Hopper",
        slug: "grace-hopper",
        headline: "Rear Admiral",
        company: "US Navy",
        city: "Arlington",
        about: "Led the development of early compilers.",
    },
    Person {
        name: "Alan Turing",
        slug: "alan-turing",
        headline: "Mathematician",
        company: "University of Manchester",
        city: "Manchester",
        about: "Formalized computation.",
    },
    Person {
        name: "Katherine Johnson",
        slug: "katherine-johnson",
        headline: "Research Mathematician",
        company: "NASA Langley",
        city: "Hampton",
        about: "Computed orbital trajectories.",
    },
    Person {
        name: "Grace Murray",
        slug: "grace-murray",
        headline: "Engineer",
        company: "Remington Rand",
        city: "Philadelphia",
        about: "Maintained the UNIVAC I.",
    },
];

const BASE: &str = "https://people.example.com/in/";

fn summary(p: &Person) -> RawResult {
    RawResult::new()
        .with("name", p.name)
        .with("profileUrl", format!("{BASE}{}", p.slug))
        .with("headline", p.headline)
        .with("company", p.company)
        .with("city", p.city)
}

/// Every person whose name contains all whitespace-separated terms of `text`.
pub fn search(text: &str, limit: usize) -> Vec<RawResult> {
    let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    DIRECTORY
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            terms.iter().all(|t| name.contains(t.as_str()))
        })
        .take(limit)
        .map(summary)
        .collect()
}

/// Full record for a profile URL produced by [`search`].
pub fn detail(source_uri: &str) -> Option<RawResult> {
    let slug = source_uri.strip_prefix(BASE)?;
    DIRECTORY
        .iter()
        .find(|p| p.slug == slug)
        .map(|p| summary(p).with("about", p.about).with("connections", 500))
}
