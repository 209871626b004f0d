use crate::{
    collection::{Element, FieldAccess, PersistentList, PersistentListDescriptor, PropertyAccess},
    error::InternalError,
    model::{
        BootCollection, BootElement, BootIndex, BootProperty, BootValue, ManagedTypeDescriptor,
        RuntimeModelCreationContext,
    },
    session::{SessionId, SharedSessionContract},
    traits::{ElementValue, ElementValueKind, Path},
    value::{Value, ValueKind},
};
use relmap_config::RelmapConfig;
use std::sync::Arc;

///
/// Person
/// Test owner with a basic list and an entity list.
///

#[derive(Debug, Default)]
pub struct Person {
    pub tags: PersistentList<String>,
    pub friends: PersistentList<Friend>,
}

impl Path for Person {
    const PATH: &'static str = "Person";
}

///
/// Friend
/// Test entity; rows carry only its identifier.
///

#[derive(Debug)]
pub struct Friend {
    pub id: i64,
}

impl ElementValue for Friend {
    fn kind() -> ElementValueKind {
        ElementValueKind::Entity
    }

    fn to_value(&self) -> Value {
        Value::Int(self.id)
    }

    fn from_value(_: &Value) -> Option<Self> {
        None
    }
}

///
/// Sessions
///

pub struct OpenSession;

impl SharedSessionContract for OpenSession {
    fn session_id(&self) -> SessionId {
        SessionId(1)
    }

    fn is_open(&self) -> bool {
        true
    }
}

pub struct ClosedSession;

impl SharedSessionContract for ClosedSession {
    fn session_id(&self) -> SessionId {
        SessionId(2)
    }

    fn is_open(&self) -> bool {
        false
    }
}

fn person_tags(person: &Person) -> &PersistentList<String> {
    &person.tags
}

fn person_tags_mut(person: &mut Person) -> &mut PersistentList<String> {
    &mut person.tags
}

fn person_friends(person: &Person) -> &PersistentList<Friend> {
    &person.friends
}

fn person_friends_mut(person: &mut Person) -> &mut PersistentList<Friend> {
    &mut person.friends
}

pub fn tags_access() -> Arc<dyn PropertyAccess<Person, PersistentList<String>>> {
    Arc::new(FieldAccess::new(person_tags, person_tags_mut))
}

pub fn person_context() -> RuntimeModelCreationContext {
    RuntimeModelCreationContext::new(RelmapConfig::default())
}

pub fn tags_property(index: BootIndex) -> BootProperty {
    BootProperty::new(
        "tags",
        BootValue::Collection(BootCollection::list(
            "person_tags",
            "person_id",
            index,
            BootElement::basic(ValueKind::Text, "tag"),
        )),
    )
}

pub fn tags_descriptor_with(
    property: &BootProperty,
    context: &RuntimeModelCreationContext,
) -> Result<PersistentListDescriptor<Person, String>, InternalError> {
    PersistentListDescriptor::new(
        property,
        &ManagedTypeDescriptor::entity(Person::PATH),
        tags_access(),
        context,
    )
}

pub fn tags_descriptor(index: BootIndex) -> PersistentListDescriptor<Person, String> {
    tags_descriptor_with(&tags_property(index), &person_context())
        .expect("tags descriptor should build")
}

pub fn friends_descriptor() -> PersistentListDescriptor<Person, Friend> {
    let property = BootProperty::new(
        "friends",
        BootValue::Collection(BootCollection::list(
            "person_friends",
            "person_id",
            BootIndex::column("position"),
            BootElement::entity("Friend", "friend_id").nullable(),
        )),
    );

    PersistentListDescriptor::new(
        &property,
        &ManagedTypeDescriptor::entity(Person::PATH),
        Arc::new(FieldAccess::new(person_friends, person_friends_mut)),
        &person_context(),
    )
    .expect("friends descriptor should build")
}

/// Fresh handles, one per value.
pub fn elements(values: &[&str]) -> Vec<Element<String>> {
    values
        .iter()
        .map(|value| Element::new((*value).to_string()))
        .collect()
}

pub fn texts(list: &PersistentList<String>) -> Vec<Option<&str>> {
    list.iter()
        .map(|element| element.get().map(String::as_str))
        .collect()
}
