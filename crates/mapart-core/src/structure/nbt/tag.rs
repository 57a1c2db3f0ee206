/// Tag kinds the structure formats use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    End,
    Int,
    String,
    List,
    Compound,
}

impl TagType {
    pub fn id(self) -> u8 {
        match self {
            TagType::End => 0,
            TagType::Int => 3,
            TagType::String => 8,
            TagType::List => 9,
            TagType::Compound => 10,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(TagType::End),
            3 => Some(TagType::Int),
            8 => Some(TagType::String),
            9 => Some(TagType::List),
            10 => Some(TagType::Compound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Int(i32),
    String(String),
    List(List),
    Compound(Compound),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Int(_) => TagType::Int,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Tag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_string())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

impl From<List> for Tag {
    fn from(v: List) -> Self {
        Tag::List(v)
    }
}

impl From<Compound> for Tag {
    fn from(v: Compound) -> Self {
        Tag::Compound(v)
    }
}

/// A homogeneous list. The element type is kept even when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: TagType,
    items: Vec<Tag>,
}

impl List {
    pub fn empty(element: TagType) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    pub fn ints(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            element: TagType::Int,
            items: values.into_iter().map(Tag::Int).collect(),
        }
    }

    pub fn compounds(values: impl IntoIterator<Item = Compound>) -> Self {
        Self {
            element: TagType::Compound,
            items: values.into_iter().map(Tag::Compound).collect(),
        }
    }

    pub fn lists(values: impl IntoIterator<Item = List>) -> Self {
        Self {
            element: TagType::List,
            items: values.into_iter().map(Tag::List).collect(),
        }
    }

    /// Build from decoded items. Returns `None` if any item has another type.
    pub fn from_items(element: TagType, items: Vec<Tag>) -> Option<Self> {
        items
            .iter()
            .all(|t| t.tag_type() == element)
            .then_some(Self { element, items })
    }

    pub fn element(&self) -> TagType {
        self.element
    }

    pub fn items(&self) -> &[Tag] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items as ints, if this is an int list.
    pub fn to_ints(&self) -> Option<Vec<i32>> {
        if self.element != TagType::Int {
            return None;
        }
        self.items.iter().map(Tag::as_int).collect()
    }
}

/// Named tags in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Tag>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Tag>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_round_trip() {
        for t in [TagType::End, TagType::Int, TagType::String, TagType::List, TagType::Compound] {
            assert_eq!(TagType::from_id(t.id()), Some(t));
        }
        assert_eq!(TagType::from_id(1), None);
    }

    #[test]
    fn test_compound_keeps_order_and_replaces_in_place() {
        let mut c = Compound::new().with("b", 1).with("a", "x");
        c.insert("b", 2);
        let keys: Vec<_> = c.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(c.get("b").and_then(Tag::as_int), Some(2));
    }

    #[test]
    fn test_list_homogeneity() {
        assert!(List::from_items(TagType::Int, vec![Tag::Int(1), Tag::from("x")]).is_none());
        let l = List::from_items(TagType::Int, vec![Tag::Int(1), Tag::Int(2)]).unwrap();
        assert_eq!(l.to_ints(), Some(vec![1, 2]));
        assert_eq!(List::empty(TagType::Compound).element(), TagType::Compound);
    }
}
