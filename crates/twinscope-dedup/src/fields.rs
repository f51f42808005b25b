use std::fmt;
use std::hash::Hash;

/// A named dimension that carries a weight in the combined similarity.
pub trait WeightKey: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Every key, in display order.
    const ALL: &'static [Self];

    /// Name used in config override tables.
    fn name(self) -> &'static str;

    /// Human-readable label for the weight display.
    fn label(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Record fields compared in record mode. `Creators` is the synthetic
/// joined-creators entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoredField {
    Title,
    ShortTitle,
    Creators,
    Date,
    Publisher,
    Place,
    Journal,
    Doi,
    Isbn,
    ItemType,
}

impl WeightKey for ScoredField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::ShortTitle,
        Self::Creators,
        Self::Date,
        Self::Publisher,
        Self::Place,
        Self::Journal,
        Self::Doi,
        Self::Isbn,
        Self::ItemType,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ShortTitle => "shortTitle",
            Self::Creators => "creators",
            Self::Date => "date",
            Self::Publisher => "publisher",
            Self::Place => "place",
            Self::Journal => "journal",
            Self::Doi => "DOI",
            Self::Isbn => "ISBN",
            Self::ItemType => "itemType",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::ShortTitle => "Short Title",
            Self::Creators => "Creators",
            Self::Date => "Date",
            Self::Publisher => "Publisher",
            Self::Place => "Place",
            Self::Journal => "Journal",
            Self::Doi => "DOI",
            Self::Isbn => "ISBN",
            Self::ItemType => "Item Type",
        }
    }
}

/// Name parts compared in name mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NamePart {
    LastName,
    FirstName,
    FullName,
}

impl WeightKey for NamePart {
    const ALL: &'static [Self] = &[Self::LastName, Self::FirstName, Self::FullName];

    fn name(self) -> &'static str {
        match self {
            Self::LastName => "lastName",
            Self::FirstName => "firstName",
            Self::FullName => "fullName",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::LastName => "Last Name",
            Self::FirstName => "First Name",
            Self::FullName => "Full Name",
        }
    }
}
