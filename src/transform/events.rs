//! Birthday and task calendars.
//!
//! A `<terminliste>` tag lists the birthdays of all living contacts and the
//! scheduled open tasks of all stored pages. By default the list covers 3
//! days before until 10 days after the current day, which can be changed
//! with the `tagedanach` and `tagedavor` options. With a `jahr` option, all
//! events of that year are listed instead.

use super::{
    Pass,
    contact::{self, CONTACT_TAG},
    date::{self, PartialDate},
};
use crate::{
    config::Messages,
    path,
    repository::Repository,
    tree::{Element, NodeId, Options, Table, TableCell, TableRow, TaskState, Tree},
};
use time::{Date, Duration};

mod keys {
    pub const DATE: &str = "TerminTransformer.table.date";
    pub const NAME: &str = "TerminTransformer.table.name";
    pub const AGE: &str = "TerminTransformer.table.age";
}

/// The name of the tag which is replaced by the event table.
const EVENTS_TAG: &str = "terminliste";

/// Default number of past days shown.
const DAYS_AFTER: i64 = 3;

/// Default number of future days shown.
const DAYS_BEFORE: i64 = 10;

/// A dated event found in a page.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Event {
    /// The page which contains the event.
    page: String,
    /// The link text. If `None`, the page name is used.
    description: Option<String>,
    /// The event date. At least the month or the year is known.
    date: PartialDate,
}

/// Where an event lies relative to the current day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Tense {
    Past,
    Present,
    Future,
}

impl Tense {
    fn class(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Present => "present",
            Self::Future => "future",
        }
    }
}

/// One row of the event table.
#[derive(Debug)]
struct Entry {
    event: Event,
    /// The date shown in the table.
    shown: PartialDate,
    /// The date which orders the table. The year is always known.
    sort_date: PartialDate,
    tense: Option<Tense>,
    /// Years since the event, if its year is known.
    age: Option<i32>,
}

/// Which events to list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Range {
    /// All events of a year.
    Year(i32),
    /// The events from some days before until some days after today.
    Current { days_after: i64, days_before: i64 },
}

impl Range {
    /// Reads the range from the tag options, or returns `None` if an option
    /// is not a number.
    fn from_options(options: &Options) -> Option<Self> {
        if let Some(year) = options.get("jahr") {
            return year.parse().ok().map(Self::Year);
        }
        let days = |key: &str, default: i64| match options.get(key) {
            Some(days) => days.parse().ok(),
            None => Some(default),
        };
        Some(Self::Current {
            days_after: days("tagedanach", DAYS_AFTER)?,
            days_before: days("tagedavor", DAYS_BEFORE)?,
        })
    }
}

/// Replaces `<terminliste>` tags with a table of birthdays and scheduled
/// tasks from all pages of the repository.
pub struct Events<'a> {
    /// The pages to search for events.
    repository: &'a dyn Repository,
    /// Table headings.
    messages: &'a dyn Messages,
    /// The day against which events are listed.
    today: Date,
}

impl<'a> Events<'a> {
    /// Creates a new event table pass for the current local day.
    pub fn new(repository: &'a dyn Repository, messages: &'a dyn Messages) -> Self {
        Self {
            repository,
            messages,
            today: date::local_now().date(),
        }
    }

    /// Uses `today` as the current day.
    #[must_use]
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    /// Collects the events of all stored pages.
    fn events(&self) -> Vec<Event> {
        let mut events = vec![];
        for path in self.repository.page_paths() {
            let Some(page) = self.repository.lookup_page(&path) else {
                continue;
            };
            if let Some(date) = birthday(&page, self.today) {
                events.push(Event {
                    page: path.clone(),
                    description: None,
                    date,
                });
            }
            events.extend(tasks(&page).map(|(date, description)| Event {
                page: path.clone(),
                description,
                date,
            }));
        }
        log::debug!("found {} events", events.len());
        events
    }

    /// Lists all events of `year`, shown in that year.
    fn year_entries(&self, year: i32) -> Vec<Entry> {
        self.events()
            .into_iter()
            .filter_map(|event| {
                let age = event.date.year.map(|since| year - since);
                if age.is_some_and(|age| age < 0) {
                    return None;
                }
                let shown = event.date.with_year(year);
                Some(Entry {
                    event,
                    shown,
                    sort_date: shown,
                    tense: None,
                    age,
                })
            })
            .collect()
    }

    /// Lists the events from `days_after` days before until `days_before`
    /// days after today. Returns `None` if the range is out of bounds.
    fn current_entries(&self, days_after: i64, days_before: i64) -> Option<Vec<Entry>> {
        let from = self.today.checked_sub(Duration::days(days_after))?;
        let to = self.today.checked_add(Duration::days(days_before))?;
        let today = PartialDate::from(self.today);
        let within = |date: &PartialDate| {
            date.compare(&from.into()).is_ge() && date.compare(&to.into()).is_le()
        };

        let mut entries = vec![];
        for event in self.events() {
            // The year differs at the turn of the year.
            let Some((year, sort_date)) = [from.year(), to.year()]
                .into_iter()
                .map(|year| (year, event.date.with_year(year)))
                .find(|(_, date)| within(date))
            else {
                continue;
            };

            let age = event.date.year.map(|since| year - since);
            if age.is_some_and(|age| age < 0) {
                continue;
            }

            let tense = match sort_date.compare(&today) {
                core::cmp::Ordering::Less => Tense::Past,
                core::cmp::Ordering::Equal => Tense::Present,
                core::cmp::Ordering::Greater => Tense::Future,
            };
            entries.push(Entry {
                shown: event.date,
                event,
                sort_date,
                tense: Some(tense),
                age,
            });
        }
        Some(entries)
    }

    /// Builds the event table, in chronological order.
    fn table(&self, tree: &mut Tree, mut entries: Vec<Entry>) -> NodeId {
        entries.sort_by(|a, b| a.sort_date.compare(&b.sort_date));

        let heading = |tree: &mut Tree, key: &str, params: Option<&str>| {
            let text = tree.add_text(self.messages.message(key));
            TableCell {
                header: true,
                params: params.map(str::to_string),
                content: Some(text),
            }
        };
        let mut rows = vec![TableRow {
            params: None,
            cells: vec![
                heading(tree, keys::DATE, None),
                heading(tree, keys::NAME, None),
                heading(tree, keys::AGE, Some("right")),
            ],
        }];

        for entry in entries {
            let date = tree.add_text(entry.shown.to_string());
            let name = entry
                .event
                .description
                .unwrap_or_else(|| path::name(&entry.event.page).to_string());
            let name = tree.add_text(name);
            let link = tree.add(
                Element::LinkPage {
                    path: Some(entry.event.page),
                    anchor: None,
                    child: Some(name),
                },
                None,
            );
            let age = match entry.age {
                Some(age) => TableCell {
                    header: false,
                    params: Some("right".to_string()),
                    content: Some(tree.add_text(age.to_string())),
                },
                None => TableCell::default(),
            };

            rows.push(TableRow {
                params: entry.tense.map(|tense| tense.class().to_string()),
                cells: vec![
                    TableCell {
                        header: false,
                        params: entry.shown.year.map(|_| "right".to_string()),
                        content: Some(date),
                    },
                    TableCell {
                        header: false,
                        params: None,
                        content: Some(link),
                    },
                    age,
                ],
            });
        }

        tree.add(
            Element::Table(Table {
                params: Some("geburtstagsliste".to_string()),
                rows,
            }),
            None,
        )
    }
}

impl Pass for Events<'_> {
    fn name(&self) -> &'static str {
        "events"
    }

    fn rewrite(&mut self, tree: &mut Tree, node: NodeId) -> Option<NodeId> {
        let Element::XmlTag {
            prefix: None,
            name,
            options,
            ..
        } = tree.element(node)
        else {
            return Some(node);
        };
        if !name.eq_ignore_ascii_case(EVENTS_TAG) {
            return Some(node);
        }

        let entries = match Range::from_options(options) {
            Some(Range::Year(year)) => Some(self.year_entries(year)),
            Some(Range::Current {
                days_after,
                days_before,
            }) => self.current_entries(days_after, days_before),
            None => None,
        };
        let Some(entries) = entries else {
            log::warn!("keeping event list with invalid options {options:?}");
            return Some(node);
        };
        Some(self.table(tree, entries))
    }
}

/// Finds the birthday of a living contact in a page.
fn birthday(tree: &Tree, today: Date) -> Option<PartialDate> {
    let root = tree.root()?;
    let mut in_contact = false;
    let mut birthday = None;
    let mut died = false;
    for node in tree.traverse(root, |e| matches!(e, Element::XmlTag { prefix: None, .. }), true) {
        let Element::XmlTag { name, .. } = tree.element(node) else {
            continue;
        };
        match name.as_str() {
            CONTACT_TAG => in_contact = true,
            "geburtstag" | "geburtsdatum" if in_contact => {
                birthday = contact::field_text(tree, node, today);
            }
            "todestag" if in_contact => died = true,
            _ => {}
        }
    }

    if died {
        return None;
    }
    PartialDate::parse(&birthday?).filter(|date| date.month.is_some() || date.year.is_some())
}

/// Finds the scheduled tasks of a page which are not done, with their
/// descriptions.
fn tasks(tree: &Tree) -> impl Iterator<Item = (PartialDate, Option<String>)> + '_ {
    let tasks = tree
        .root()
        .map(|root| tree.traverse(root, |e| matches!(e, Element::Task(_)), true))
        .unwrap_or_default();
    tasks.into_iter().filter_map(|node| {
        let Element::Task(task) = tree.element(node) else {
            return None;
        };
        if task.state == TaskState::Closed {
            return None;
        }
        let date = PartialDate::parse(task.schedule.as_deref()?)?;
        (date.month.is_some() || date.year.is_some()).then(|| (date, task.description.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    #[test]
    fn range_options() {
        let options = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|&(key, value)| (key.to_string(), value.to_string()))
                .collect::<Options>()
        };
        assert_eq!(
            Range::from_options(&options(&[])),
            Some(Range::Current {
                days_after: 3,
                days_before: 10
            })
        );
        assert_eq!(
            Range::from_options(&options(&[("tagedanach", "0"), ("tagedavor", "7")])),
            Some(Range::Current {
                days_after: 0,
                days_before: 7
            })
        );
        assert_eq!(
            Range::from_options(&options(&[("jahr", "2016"), ("tagedavor", "x")])),
            Some(Range::Year(2016))
        );
        assert_eq!(Range::from_options(&options(&[("jahr", "next")])), None);
        assert_eq!(Range::from_options(&options(&[("tagedanach", "-")])), None);
    }

    #[test]
    fn birthdays_of_living_contacts() {
        let today = time::macros::date!(2024 - 03 - 15);
        let page = |json: &str| json.parse::<Tree>().unwrap();

        let living = page(
            r#"{ "type": "xml-tag", "name": "kontakt", "child": { "type": "list", "items": [
                { "type": "xml-tag", "name": "name", "child": { "type": "text", "text": "Muster" } },
                { "type": "xml-tag", "name": "geburtstag", "child": { "type": "text", "text": "07.03.1980" } }
            ] } }"#,
        );
        assert_eq!(
            birthday(&living, today),
            PartialDate::parse("07.03.1980")
        );

        let dead = page(
            r#"{ "type": "xml-tag", "name": "kontakt", "child": { "type": "list", "items": [
                { "type": "xml-tag", "name": "geburtsdatum", "child": { "type": "text", "text": "1900" } },
                { "type": "xml-tag", "name": "todestag", "child": { "type": "text", "text": "1970" } }
            ] } }"#,
        );
        assert_eq!(birthday(&dead, today), None);

        let no_contact = page(
            r#"{ "type": "xml-tag", "name": "geburtstag", "child": { "type": "text", "text": "07.03.1980" } }"#,
        );
        assert_eq!(birthday(&no_contact, today), None);
    }

    #[test]
    fn entries() {
        let _ = env_logger::try_init();
        let mut repository = MemoryRepository::new();
        repository.insert(
            "/Tasks",
            r#"{ "type": "list", "items": [
                { "type": "task", "schedule": "16.03.2024", "description": "Dentist" },
                { "type": "task", "state": "closed", "schedule": "15.03.2024", "description": "Done" },
                { "type": "task", "schedule": "12.03.", "description": "Yearly" },
                { "type": "task", "description": "Unscheduled" }
            ] }"#
                .parse()
                .unwrap(),
        );
        let settings = crate::config::Settings::default();
        let events = Events::new(&repository, &settings).with_today(time::macros::date!(2024 - 03 - 15));

        let current = events.current_entries(3, 10).unwrap();
        let summary = current
            .iter()
            .map(|entry| (entry.event.description.as_deref(), entry.tense, entry.age))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                (Some("Dentist"), Some(Tense::Future), Some(0)),
                (Some("Yearly"), Some(Tense::Past), None),
            ]
        );

        let year = events.year_entries(2023);
        assert_eq!(year.len(), 1);
        assert_eq!(year[0].shown.to_string(), "12.03.2023");
        assert_eq!(year[0].event.description.as_deref(), Some("Yearly"));
    }
}
