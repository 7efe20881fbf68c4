//! Contact cards.
//!
//! A `<kontakt>` tag holds one field tag per datum, for example:
//!
//! ```text
//! <kontakt>
//!   <vorname>Max</vorname> <name>Muster</name>
//!   <geburtstag>07.03.1980</geburtstag>
//!   <email>max@example.com</email>
//!   <adresse gültigbis="31.12.2030"><ort>Berlin</ort></adresse>
//! </kontakt>
//! ```
//!
//! Any field tag or address with a `gültigbis` date which is not after the
//! current day is ignored.

use super::{Pass, date};
use crate::tree::{Element, NodeId, Options, Table, TableCell, TableRow, Tree};
use std::collections::BTreeMap;
use time::Date;

/// The name of the tag which marks a contact.
pub(super) const CONTACT_TAG: &str = "kontakt";

/// The option which limits how long a tag is valid, as `TT.MM.JJJJ`.
const VALID_UNTIL: &str = "gültigbis";

/// A way to reach someone. Channels are shown in declaration order.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
enum Channel {
    Homepage,
    Mobile,
    Email,
    Aim,
    Facebook,
    GoogleTalk,
    Icq,
    Jabber,
    LinkedIn,
    Msn,
    Qq,
    Skype,
    Twitter,
    WeChat,
    Xing,
    Yahoo,
    Youtube,
}

impl Channel {
    fn from_tag(name: &str) -> Option<Self> {
        Some(match name {
            "homepage" => Self::Homepage,
            "mobil" => Self::Mobile,
            "email" => Self::Email,
            "aim" => Self::Aim,
            "facebook" => Self::Facebook,
            "googletalk" => Self::GoogleTalk,
            "icq" => Self::Icq,
            "jabber" => Self::Jabber,
            "linkedin" => Self::LinkedIn,
            "msn" => Self::Msn,
            "qq" => Self::Qq,
            "skype" => Self::Skype,
            "twitter" => Self::Twitter,
            "wechat" => Self::WeChat,
            "xing" => Self::Xing,
            "yahoo" => Self::Yahoo,
            "youtube" => Self::Youtube,
            _ => return None,
        })
    }

    fn label(self) -> &'static str {
        match self {
            Self::Homepage => "Homepage",
            Self::Mobile => "Mobil",
            Self::Email => "E-Mail",
            Self::Aim => "AIM",
            Self::Facebook => "Facebook",
            Self::GoogleTalk => "Google Talk",
            Self::Icq => "ICQ",
            Self::Jabber => "Jabber",
            Self::LinkedIn => "LinkedIn",
            Self::Msn => "MSN",
            Self::Qq => "QQ",
            Self::Skype => "Skype",
            Self::Twitter => "Twitter",
            Self::WeChat => "WeChat",
            Self::Xing => "Xing",
            Self::Yahoo => "Yahoo",
            Self::Youtube => "Youtube",
        }
    }

    /// The link target for an account, or `None` if accounts of this
    /// channel are not linked.
    fn url(self, account: &str) -> Option<String> {
        let prefix = match self {
            Self::Homepage => "http://",
            Self::Email => "mailto:",
            Self::Icq => "http://www.icq.com/people/",
            Self::Skype => "skype:",
            Self::Twitter => "http://twitter.com/",
            Self::Xing => "https://www.xing.com/profile/",
            Self::Youtube => "http://www.youtube.com/user/",
            Self::Facebook => {
                return Some(if account.starts_with("http://") {
                    account.to_string()
                } else if account.contains('/') {
                    format!("http://www.facebook.com/people/{account}")
                } else {
                    format!("http://www.facebook.com/{account}")
                });
            }
            Self::LinkedIn => {
                return Some(if account.bytes().all(|b| b.is_ascii_digit()) {
                    format!("http://www.linkedin.com/profile/view?id={account}")
                } else {
                    format!("http://www.linkedin.com/in/{account}")
                });
            }
            _ => return None,
        };

        Some(if account.starts_with(prefix) {
            account.to_string()
        } else {
            format!("{prefix}{account}")
        })
    }
}

/// Accounts by channel. Only channels with at least one account have an
/// entry.
type Channels = BTreeMap<Channel, Vec<String>>;

/// The data of a contact card.
#[derive(Debug, Default)]
struct Person {
    name: Option<String>,
    birth_name: Option<String>,
    given_names: Vec<String>,
    nicknames: Vec<String>,
    title: Option<String>,
    birthday: Option<String>,
    death_day: Option<String>,
    photos: Vec<String>,
    channels: Channels,
    addresses: Vec<Address>,
    categories: Vec<String>,
}

#[derive(Debug, Default)]
struct Address {
    name: Option<String>,
    street: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    country: Option<String>,
    state: Option<String>,
    district: Option<String>,
    phones: Vec<String>,
    faxes: Vec<String>,
    channels: Channels,
    /// Free-form content, shown in italics.
    description: Option<NodeId>,
    categories: Vec<String>,
}

/// Replaces `<kontakt>` tags with a formatted contact card.
pub struct Contact {
    /// The day against which ages and `gültigbis` dates are checked.
    today: Date,
}

impl Contact {
    /// Creates a new contact card pass for the current local day.
    pub fn new() -> Self {
        Self {
            today: date::local_now().date(),
        }
    }

    /// Uses `today` as the current day.
    #[must_use]
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    /// Reads the field tags of a contact.
    fn person(&self, tree: &Tree, content: Option<NodeId>) -> Person {
        let mut person = Person::default();
        for (node, name) in field_tags(tree, content) {
            let text = || field_text(tree, node, self.today);
            match name {
                "name" => person.name = text(),
                "geburtsname" => person.birth_name = text(),
                "vorname" => person.given_names.extend(text()),
                "rufname" => person.nicknames.extend(text()),
                "titel" => person.title = text(),
                "geburtstag" => person.birthday = text(),
                "todestag" => person.death_day = text(),
                "foto" => person.photos.extend(text()),
                "adresse" => {
                    if let Some(address) = self.address(tree, node) {
                        person.addresses.push(address);
                    }
                }
                "kategorie" => person.categories.extend(text()),
                _ => add_account(&mut person.channels, name, text()),
            }
        }
        person
    }

    /// Reads the field tags of an address, or returns `None` if the address
    /// is no longer valid.
    fn address(&self, tree: &Tree, node: NodeId) -> Option<Address> {
        let Element::XmlTag { options, child, .. } = tree.element(node) else {
            return None;
        };
        if !is_valid(options, self.today) {
            return None;
        }

        let mut address = Address::default();
        for (node, name) in field_tags(tree, *child) {
            let text = || field_text(tree, node, self.today);
            match name {
                "name" => address.name = text(),
                "straße" => address.street = text(),
                "plz" => address.postcode = text(),
                "ort" => address.city = text(),
                "land" => address.country = text(),
                "bundesland" => address.state = text(),
                "bezirk" => address.district = text(),
                "telefon" => address.phones.extend(text()),
                "fax" => address.faxes.extend(text()),
                "beschreibung" => address.description = tree.child(node),
                "kategorie" => address.categories.extend(text()),
                _ => add_account(&mut address.channels, name, text()),
            }
        }
        Some(address)
    }

    /// Builds the card for a contact.
    fn card(&self, tree: &mut Tree, person: &Person) -> NodeId {
        let mut out = vec![];

        if !person.photos.is_empty() {
            let images = person
                .photos
                .iter()
                .map(|photo| {
                    let options =
                        Options::from([("class".to_string(), "kontaktseite-bild".to_string())]);
                    tree.add(
                        Element::Image {
                            url: photo.clone(),
                            options,
                        },
                        None,
                    )
                })
                .collect();
            let images = tree.add(Element::List(images), None);
            out.push(tree.add(
                Element::HtmlTag {
                    name: "div".to_string(),
                    attributes: Some(r#"class="kontaktseite-bilder""#.to_string()),
                    child: Some(images),
                },
                None,
            ));
        }

        if let Some(title) = &person.title {
            out.push(text_paragraph(tree, title));
        }

        let mut name = person.name.clone().unwrap_or_default();
        if let Some(birth_name) = &person.birth_name {
            name += &format!(" (geb. {birth_name})");
        }
        if !person.given_names.is_empty() {
            if !name.is_empty() {
                name += ", ";
            }
            name += &person.given_names.join(" ");
        }
        if !person.nicknames.is_empty() {
            name += &format!(" ({})", person.nicknames.join(", "));
        }
        let name = tree.add_text(name);
        let name = tree.add(Element::Bold { child: Some(name) }, None);
        out.push(paragraph(tree, vec![name]));

        if person.birthday.is_some() || person.death_day.is_some() {
            let mut content = vec![];
            if let Some(birthday) = &person.birthday {
                content.push(tree.add_text(format!("* {birthday}")));
            }
            if person.birthday.is_some() && person.death_day.is_some() {
                content.push(tree.add(Element::Html(" &nbsp; ".to_string()), None));
            }
            if let Some(death_day) = &person.death_day {
                content.push(tree.add(Element::Html("&dagger; ".to_string()), None));
                content.push(tree.add_text(death_day.as_str()));
            }
            if let Some(birthday) = &person.birthday
                && let Some(age) = age(birthday, person.death_day.as_deref(), self.today)
            {
                content.push(tree.add_text(format!(" ({age})")));
            }
            out.push(paragraph(tree, content));
        }

        if !person.channels.is_empty() {
            out.push(tree.add(Element::VerticalSpace, None));
            channel_paragraphs(tree, &person.channels, &mut out);
        }

        for address in &person.addresses {
            if let Some(table) = address_table(tree, address) {
                out.push(tree.add(Element::VerticalSpace, None));
                out.push(table);
            }
        }

        if !person.categories.is_empty() {
            out.push(tree.add(Element::VerticalSpace, None));
            out.push(labelled(tree, "Kontakt-Kategorien", &person.categories, |_| None));
        }

        tree.add(Element::List(out), None)
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Contact {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn rewrite(&mut self, tree: &mut Tree, node: NodeId) -> Option<NodeId> {
        match tree.element(node) {
            Element::XmlTag {
                prefix: None,
                name,
                child,
                ..
            } if name == CONTACT_TAG => {
                let person = self.person(tree, *child);
                log::trace!("formatting contact {:?}", person.name);
                Some(self.card(tree, &person))
            }
            _ => Some(node),
        }
    }
}

/// Returns the text of a field tag, or `None` if the text is empty or the
/// tag is no longer valid.
pub(super) fn field_text(tree: &Tree, node: NodeId, today: Date) -> Option<String> {
    if let Element::XmlTag { options, .. } = tree.element(node)
        && !is_valid(options, today)
    {
        return None;
    }
    Some(tree.string_content(node)).filter(|text| !text.is_empty())
}

/// Returns false if the tag options carry a `gültigbis` date which is
/// invalid or not after `today`.
fn is_valid(options: &Options, today: Date) -> bool {
    options
        .get(VALID_UNTIL)
        .is_none_or(|until| date::parse_date(until).is_some_and(|until| until > today))
}

/// The outermost tags below `content`, with their names.
fn field_tags(tree: &Tree, content: Option<NodeId>) -> Vec<(NodeId, &str)> {
    let Some(content) = content else {
        return vec![];
    };
    tree.traverse(content, |e| matches!(e, Element::XmlTag { .. }), false)
        .into_iter()
        .filter_map(|node| match tree.element(node) {
            Element::XmlTag { name, .. } => Some((node, name.as_str())),
            _ => None,
        })
        .collect()
}

/// Adds an account if `name` is the tag of a channel. Other tags are
/// ignored.
fn add_account(channels: &mut Channels, name: &str, account: Option<String>) {
    if let Some(channel) = Channel::from_tag(name)
        && let Some(account) = account
    {
        channels.entry(channel).or_default().push(account);
    }
}

/// The age from `birthday` until `death_day` or `today` in years, with one
/// decimal and a decimal comma. The fraction counts days since the last
/// birthday, ignoring leap days.
fn age(birthday: &str, death_day: Option<&str>, today: Date) -> Option<String> {
    let from = date::parse_date(birthday)?;
    let to = match death_day {
        Some(death_day) => date::parse_date(death_day)?,
        None => today,
    };

    let (from_day, to_day) = (i32::from(from.ordinal()), i32::from(to.ordinal()));
    let mut years = to.year() - from.year();
    if to_day < from_day {
        years -= 1;
    }
    let mut days = to_day - from_day;
    if days < 0 {
        days += 365;
    }

    let age = f64::from(years) + f64::from(days) / 365.0;
    Some(format!("{age:.1}").replace('.', ","))
}

/// Builds the address table, or returns `None` if the address has no
/// displayable data.
fn address_table(tree: &mut Tree, address: &Address) -> Option<NodeId> {
    let mut location = vec![];
    for line in [&address.name, &address.street].into_iter().flatten() {
        location.push(text_paragraph(tree, line));
    }

    let place = [&address.postcode, &address.city]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !place.is_empty() {
        location.push(text_paragraph(tree, &place.join(" ")));
    }

    let region = [&address.state, &address.district]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>();
    let mut country = address.country.clone().unwrap_or_default();
    if !region.is_empty() {
        if !country.is_empty() {
            country.push(' ');
        }
        country += &format!("({})", region.join(", "));
    }
    if !country.is_empty() {
        location.push(text_paragraph(tree, &country));
    }

    if let Some(description) = address.description {
        let description = tree.deep_clone(description);
        let italic = tree.add(
            Element::Italic {
                child: Some(description),
            },
            None,
        );
        location.push(paragraph(tree, vec![italic]));
    }

    let mut contact = vec![];
    if !address.phones.is_empty() {
        contact.push(labelled(tree, "Telefon", &address.phones, |_| None));
    }
    if !address.faxes.is_empty() {
        contact.push(labelled(tree, "Fax", &address.faxes, |_| None));
    }
    channel_paragraphs(tree, &address.channels, &mut contact);
    if !address.categories.is_empty() {
        contact.push(labelled(tree, "Kategorien", &address.categories, |_| None));
    }

    if location.is_empty() && contact.is_empty() {
        return None;
    }

    let cells = [location, contact]
        .into_iter()
        .map(|content| TableCell {
            header: false,
            params: None,
            content: Some(tree.add(Element::List(content), None)),
        })
        .collect();
    Some(tree.add(
        Element::Table(Table {
            params: Some("kontaktseite-adresse".to_string()),
            rows: vec![TableRow { params: None, cells }],
        }),
        None,
    ))
}

/// Adds one labelled paragraph per channel.
fn channel_paragraphs(tree: &mut Tree, channels: &Channels, out: &mut Vec<NodeId>) {
    for (&channel, accounts) in channels {
        out.push(labelled(tree, channel.label(), accounts, |account| {
            channel.url(account)
        }));
    }
}

/// Builds a paragraph with a bold label followed by the values separated by
/// commas. A value is linked if `url` returns a target for it.
fn labelled<F>(tree: &mut Tree, label: &str, values: &[String], url: F) -> NodeId
where
    F: Fn(&str) -> Option<String>,
{
    let label = tree.add_text(format!("{label}: "));
    let mut content = vec![tree.add(Element::Bold { child: Some(label) }, None)];
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            content.push(tree.add_text(", "));
        }
        let text = tree.add_text(value.as_str());
        content.push(match url(value) {
            Some(url) => tree.add(
                Element::LinkExternal {
                    url,
                    child: Some(text),
                },
                None,
            ),
            None => text,
        });
    }
    paragraph(tree, content)
}

fn text_paragraph(tree: &mut Tree, text: &str) -> NodeId {
    let text = tree.add_text(text);
    paragraph(tree, vec![text])
}

fn paragraph(tree: &mut Tree, content: Vec<NodeId>) -> NodeId {
    let content = tree.add(Element::List(content), None);
    tree.add(
        Element::Paragraph {
            centered: false,
            indention: 0,
            vertical_spacing: false,
            child: Some(content),
        },
        None,
    )
}
