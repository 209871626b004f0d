use crate::{
    collection::{
        CollectionRole, PersistentCollectionDescriptor,
        attribute::{ListAttribute, PropertyAccess},
        instance::{Element, PersistentCollection, PersistentList},
        position::{CollectionElement, CollectionIndex},
    },
    error::{ConfigurationError, ErrorOrigin, InternalError, TypeMismatchError},
    model::{
        BootProperty, BootValue, CollectionClassification, ManagedTypeDescriptor, NavigablePath,
        RuntimeModelCreationContext,
    },
    obs::{MetricsEvent, TraceEvent, sink},
    result::{
        DomainResultCreationState, FetchParent, ListInitializerProducer, LockMode,
        generate_collection_element_domain_result, generate_collection_index_domain_result,
    },
    session::SharedSessionContract,
    traits::{ElementValue, OwnerKind},
    value::Value,
};
use relmap_config::QueuedOpsPolicy;
use std::{fmt, marker::PhantomData, sync::Arc};

///
/// PersistentListDescriptor
///
/// Descriptor of an indexed list attribute of owner `O` with elements `E`.
/// The list always has an index; element positions are stored values
/// offset by the index base.
///

pub struct PersistentListDescriptor<O, E> {
    role: CollectionRole,
    has_index_formula: bool,
    index: CollectionIndex,
    element: CollectionElement,
    attribute: ListAttribute<O, E>,
    queued_ops: QueuedOpsPolicy,
    max_position: usize,
    metrics_enabled: bool,
    _owner: PhantomData<fn() -> O>,
}

impl<O, E> PersistentListDescriptor<O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    /// Build the descriptor from the boot mapping of `boot_property`.
    ///
    /// Fails with a configuration error unless the property is an indexed
    /// list mapping declared on `O`.
    pub fn new(
        boot_property: &BootProperty,
        runtime_container: &ManagedTypeDescriptor,
        property_access: Arc<dyn PropertyAccess<O, PersistentList<E>>>,
        creation_context: &RuntimeModelCreationContext,
    ) -> Result<Self, InternalError> {
        if O::PATH != runtime_container.type_name {
            return Err(InternalError::configuration(
                ConfigurationError::OwnerMismatch {
                    owner: O::PATH.to_string(),
                    container: runtime_container.type_name.to_string(),
                },
            ));
        }

        let BootValue::Collection(collection) = &boot_property.value else {
            return Err(InternalError::configuration(
                ConfigurationError::NotACollection {
                    property: format!("{}.{}", O::PATH, boot_property.name),
                },
            ));
        };

        let role = CollectionRole::new(O::PATH, &boot_property.name);
        if collection.classification != CollectionClassification::List {
            return Err(InternalError::configuration(
                ConfigurationError::NotAnIndexedCollection {
                    role: role.to_string(),
                    found: collection.classification.label(),
                },
            ));
        }

        let boot_index = collection.index().ok_or_else(|| {
            InternalError::configuration(ConfigurationError::MissingIndex {
                role: role.to_string(),
            })
        })?;

        let config = creation_context.config();
        let has_index_formula = boot_index.has_formula();
        let index = CollectionIndex::from_boot(
            role.as_str(),
            boot_index,
            config.collections.default_list_index_base,
        )?;
        let element = CollectionElement::from_boot(role.as_str(), &collection.element, E::kind())?;
        let attribute =
            Self::create_attribute(boot_property, &element, property_access, creation_context);

        let descriptor = Self {
            role,
            has_index_formula,
            index,
            element,
            attribute,
            queued_ops: config.collections.queued_ops,
            max_position: usize::try_from(config.collections.max_list_position)
                .unwrap_or(usize::MAX),
            metrics_enabled: config.metrics.enabled,
            _owner: PhantomData,
        };

        creation_context.trace(TraceEvent::DescriptorBuilt {
            role: descriptor.role.to_string(),
            has_index_formula,
            index_base: descriptor.index.base(),
        });
        descriptor.record(MetricsEvent::DescriptorBuilt {
            role: descriptor.role.as_str(),
        });

        Ok(descriptor)
    }

    /// The list-specific plural attribute for `plural_property`.
    pub fn create_attribute(
        plural_property: &BootProperty,
        element: &CollectionElement,
        property_access: Arc<dyn PropertyAccess<O, PersistentList<E>>>,
        creation_context: &RuntimeModelCreationContext,
    ) -> ListAttribute<O, E> {
        let role = CollectionRole::new(O::PATH, &plural_property.name);

        creation_context.trace(TraceEvent::AttributeCreated {
            role: role.to_string(),
            attribute: plural_property.name.clone(),
        });

        ListAttribute::new(
            plural_property.name.clone(),
            role,
            element.nature().clone(),
            property_access,
        )
    }

    #[must_use]
    pub const fn role(&self) -> &CollectionRole {
        &self.role
    }

    #[must_use]
    pub const fn index(&self) -> &CollectionIndex {
        &self.index
    }

    #[must_use]
    pub const fn element(&self) -> &CollectionElement {
        &self.element
    }

    #[must_use]
    pub const fn attribute(&self) -> &ListAttribute<O, E> {
        &self.attribute
    }

    #[must_use]
    pub const fn queued_ops_policy(&self) -> QueuedOpsPolicy {
        self.queued_ops
    }

    /// Largest position an initializer may fill from a result row.
    #[must_use]
    pub const fn max_position(&self) -> usize {
        self.max_position
    }

    pub(crate) fn record(&self, event: MetricsEvent<'_>) {
        if self.metrics_enabled {
            sink::record(event);
        }
    }

    fn shape_mismatch(&self, found: &'static str) -> InternalError {
        InternalError::type_mismatch(
            ErrorOrigin::Collection,
            TypeMismatchError::CollectionShape {
                role: self.role.to_string(),
                expected: "list",
                found,
            },
        )
    }

    fn as_list<'c>(
        &self,
        collection: &'c PersistentCollection<E>,
    ) -> Result<&'c PersistentList<E>, InternalError> {
        collection
            .as_list()
            .ok_or_else(|| self.shape_mismatch(collection.shape()))
    }

    fn replay(
        &self,
        list: &mut PersistentList<E>,
        owner_id: &Value,
        session: &dyn SharedSessionContract,
    ) -> Result<usize, InternalError> {
        if !session.is_open() {
            return Err(InternalError::collection_invariant(format!(
                "cannot replay queued operations for '{}#{owner_id}': {} is closed",
                self.role,
                session.session_id()
            )));
        }

        // elements are not known yet; the log waits for initialization
        if !list.is_initialized() {
            return Ok(0);
        }

        match list.replay_queued() {
            Ok(applied) => {
                if applied > 0 {
                    self.record(MetricsEvent::QueuedOpsReplayed {
                        role: self.role.as_str(),
                        applied: applied as u64,
                    });
                }

                Ok(applied)
            }
            Err(err) => {
                self.record(MetricsEvent::ReplayFailed {
                    role: self.role.as_str(),
                });

                Err(InternalError::collection_invariant(format!(
                    "queued operations for '{}#{owner_id}' were not applied: {err}",
                    self.role
                )))
            }
        }
    }
}

impl<O, E> PersistentCollectionDescriptor<O, E> for PersistentListDescriptor<O, E>
where
    O: OwnerKind,
    E: ElementValue,
{
    type Producer<'a>
        = ListInitializerProducer<'a, O, E>
    where
        Self: 'a;

    fn role(&self) -> &CollectionRole {
        &self.role
    }

    fn classification(&self) -> CollectionClassification {
        CollectionClassification::List
    }

    fn element_descriptor(&self) -> &CollectionElement {
        &self.element
    }

    fn index_descriptor(&self) -> Option<&CollectionIndex> {
        Some(&self.index)
    }

    fn has_index(&self) -> bool {
        true
    }

    fn index_contains_formula(&self) -> bool {
        self.has_index_formula
    }

    fn contains(
        &self,
        collection: &PersistentCollection<E>,
        candidate: &Element<E>,
    ) -> Result<bool, InternalError> {
        let list = self.as_list(collection)?;
        self.record(MetricsEvent::MembershipCheck {
            role: self.role.as_str(),
        });

        Ok(list.contains(candidate))
    }

    fn index_of(
        &self,
        collection: &PersistentCollection<E>,
        element: &Element<E>,
    ) -> Result<Option<usize>, InternalError> {
        let list = self.as_list(collection)?;
        self.record(MetricsEvent::PositionScan {
            role: self.role.as_str(),
        });

        Ok(list.position_of(element))
    }

    fn process_queued_ops(
        &self,
        collection: &mut PersistentCollection<E>,
        owner_id: &Value,
        session: &dyn SharedSessionContract,
    ) -> Result<usize, InternalError> {
        let found = collection.shape();
        let list = collection
            .as_list_mut()
            .ok_or_else(|| self.shape_mismatch(found))?;

        match self.queued_ops {
            QueuedOpsPolicy::Ignore => {
                self.record(MetricsEvent::QueuedOpsIgnored {
                    role: self.role.as_str(),
                    pending: list.queued_ops().len() as u64,
                });

                Ok(0)
            }
            QueuedOpsPolicy::Replay => self.replay(list, owner_id, session),
        }
    }

    fn create_initializer_producer<'a>(
        &'a self,
        path: &NavigablePath,
        fetch_parent: &FetchParent,
        selected: bool,
        result_alias: Option<&str>,
        lock_mode: LockMode,
        creation_state: &mut dyn DomainResultCreationState,
    ) -> Result<Self::Producer<'a>, InternalError> {
        let index_result = generate_collection_index_domain_result(
            path.append(CollectionIndex::NAVIGABLE_NAME),
            &self.index,
            None,
            creation_state,
        )?;
        let element_result = generate_collection_element_domain_result(
            path.append(CollectionElement::NAVIGABLE_NAME),
            &self.element,
            None,
            creation_state,
        )?;

        self.record(MetricsEvent::ProducerCreated {
            role: self.role.as_str(),
            domain_results: 2,
        });

        Ok(ListInitializerProducer::new(
            self,
            fetch_parent.clone(),
            selected,
            result_alias.map(ToString::to_string),
            lock_mode,
            index_result,
            element_result,
        ))
    }
}

impl<O, E> fmt::Debug for PersistentListDescriptor<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentListDescriptor")
            .field("role", &self.role)
            .field("has_index_formula", &self.has_index_formula)
            .field("index", &self.index)
            .field("element", &self.element)
            .field("queued_ops", &self.queued_ops)
            .field("max_position", &self.max_position)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collection::PluralAttribute,
        error::{ErrorClass, ErrorDetail},
        model::{BootCollection, BootElement, BootIndex},
        obs::{MetricsSink, TraceSink, with_metrics_sink},
        result::{CollectionInitializerProducer, DomainResult, SelectionCollector},
        test_fixtures::{
            ClosedSession, OpenSession, Person, elements, person_context, tags_descriptor,
            tags_descriptor_with, tags_property, texts,
        },
        value::ValueKind,
    };
    use proptest::prelude::*;
    use relmap_config::RelmapConfig;
    use std::{cell::RefCell, sync::Mutex};

    fn tags_collection(values: &[&str]) -> (PersistentCollection<String>, Vec<Element<String>>) {
        let handles = elements(values);

        (
            PersistentList::from_elements(handles.clone()).into(),
            handles,
        )
    }

    fn config_detail(err: &InternalError) -> &ConfigurationError {
        match &err.detail {
            Some(ErrorDetail::Configuration(detail)) => detail,
            other => panic!("expected configuration detail, found {other:?}"),
        }
    }

    #[derive(Default)]
    struct EventLog {
        events: RefCell<Vec<String>>,
    }

    impl MetricsSink for EventLog {
        fn record(&self, event: MetricsEvent<'_>) {
            self.events.borrow_mut().push(format!("{event:?}"));
        }
    }

    #[derive(Default)]
    struct TraceLog {
        events: Mutex<Vec<TraceEvent>>,
    }

    impl TraceSink for TraceLog {
        fn on_event(&self, event: TraceEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }

    #[test]
    fn tags_scenario() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let (list, handles) = tags_collection(&["a", "b", "c"]);

        assert!(descriptor.has_index());
        assert!(!descriptor.index_contains_formula());
        assert_eq!(descriptor.index_of(&list, &handles[1]).unwrap(), Some(1));
        assert_eq!(
            descriptor
                .index_of(&list, &Element::new("z".to_string()))
                .unwrap(),
            None
        );
        assert!(descriptor.contains(&list, &handles[2]).unwrap());
    }

    #[test]
    fn formula_index_is_reported() {
        let descriptor = tags_descriptor(BootIndex::formula("row_number() over ()"));

        assert!(descriptor.has_index());
        assert!(descriptor.index_contains_formula());
        assert!(descriptor.index().source().is_formula());
    }

    #[test]
    fn equal_contents_are_not_the_same_element() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let (list, _) = tags_collection(&["a", "b"]);

        let lookalike = Element::new("b".to_string());

        assert_eq!(descriptor.index_of(&list, &lookalike).unwrap(), None);
        assert!(!descriptor.contains(&list, &lookalike).unwrap());
    }

    #[test]
    fn proxy_is_not_unwrapped_during_scans() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let (list, handles) = tags_collection(&["a"]);

        let proxy = Element::<String>::proxy(Value::Int(1));
        if let (Element::Proxy(p), Element::Instance(target)) = (&proxy, &handles[0]) {
            p.resolve(Arc::clone(target)).expect("resolve proxy");
        }

        assert_eq!(descriptor.index_of(&list, &proxy).unwrap(), None);
    }

    #[test]
    fn bag_instance_is_a_type_mismatch() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let bag: PersistentCollection<String> =
            crate::collection::PersistentBag::from_elements(elements(&["a"])).into();

        let err = descriptor
            .contains(&bag, &Element::Null)
            .expect_err("bag is not a list");

        assert_eq!(err.class, ErrorClass::TypeMismatch);
        assert_eq!(err.origin, ErrorOrigin::Collection);
        assert!(err.message.contains("expected a list instance, found bag"));
    }

    #[test]
    fn bag_mapping_is_rejected() {
        let property = BootProperty::new(
            "tags",
            BootValue::Collection(BootCollection::bag(
                "person_tags",
                "person_id",
                BootElement::basic(ValueKind::Text, "tag"),
            )),
        );

        let err = tags_descriptor_with(&property, &person_context())
            .expect_err("bag mapping should fail");

        assert!(err.is_configuration());
        assert!(matches!(
            config_detail(&err),
            ConfigurationError::NotAnIndexedCollection { found: "bag", .. }
        ));
    }

    #[test]
    fn basic_property_is_not_a_collection() {
        let property = BootProperty::new(
            "tags",
            BootValue::Basic {
                kind: ValueKind::Text,
                source: crate::model::SelectionSource::Column("tags".into()),
            },
        );

        let err = tags_descriptor_with(&property, &person_context())
            .expect_err("basic mapping should fail");

        assert!(matches!(
            config_detail(&err),
            ConfigurationError::NotACollection { property } if property == "Person.tags"
        ));
    }

    #[test]
    fn list_without_index_is_rejected() {
        let mut collection = BootCollection::list(
            "person_tags",
            "person_id",
            BootIndex::column("position"),
            BootElement::basic(ValueKind::Text, "tag"),
        );
        collection.index = None;
        let property = BootProperty::new("tags", BootValue::Collection(collection));

        let err = tags_descriptor_with(&property, &person_context())
            .expect_err("missing index should fail");

        assert!(matches!(
            config_detail(&err),
            ConfigurationError::MissingIndex { .. }
        ));
    }

    #[test]
    fn owner_must_match_container() {
        let err = PersistentListDescriptor::<Person, String>::new(
            &tags_property(BootIndex::column("position")),
            &ManagedTypeDescriptor::entity("Company"),
            crate::test_fixtures::tags_access(),
            &person_context(),
        )
        .expect_err("owner mismatch");

        assert!(matches!(
            config_detail(&err),
            ConfigurationError::OwnerMismatch { .. }
        ));
    }

    #[test]
    fn attribute_reaches_owner_list() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut person = Person::default();

        descriptor
            .attribute()
            .list_mut(&mut person)
            .push(Element::new("x".to_string()));

        assert_eq!(descriptor.attribute().name(), "tags");
        assert_eq!(descriptor.attribute().role().as_str(), "Person.tags");
        assert_eq!(
            descriptor.attribute().classification(),
            CollectionClassification::List
        );
        assert_eq!(texts(descriptor.attribute().list(&person)), vec![Some("x")]);
    }

    #[test]
    fn construction_is_traced() {
        let trace = Arc::new(TraceLog::default());
        let context = person_context().with_trace_sink(trace.clone());

        tags_descriptor_with(&tags_property(BootIndex::column("pos").with_base(1)), &context)
            .expect("descriptor should build");

        let events = trace.events.lock().expect("trace lock").clone();
        assert_eq!(
            events,
            vec![
                TraceEvent::AttributeCreated {
                    role: "Person.tags".to_string(),
                    attribute: "tags".to_string(),
                },
                TraceEvent::DescriptorBuilt {
                    role: "Person.tags".to_string(),
                    has_index_formula: false,
                    index_base: 1,
                },
            ]
        );
    }

    #[test]
    fn producers_build_fresh_domain_results() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let path = NavigablePath::root("Person").append("tags");
        let parent = FetchParent::new(NavigablePath::root("Person"));
        let mut state = SelectionCollector::new();

        let first = descriptor
            .create_initializer_producer(
                &path,
                &parent,
                true,
                Some("t"),
                LockMode::None,
                &mut state,
            )
            .expect("first producer");
        let second = descriptor
            .create_initializer_producer(&path, &parent, false, None, LockMode::Read, &mut state)
            .expect("second producer");

        assert_eq!(state.selection_count(), 4);
        assert_eq!(state.results().len(), 4);
        assert_ne!(
            first.index_result().selection(),
            second.index_result().selection()
        );
        assert_ne!(
            first.element_result().selection(),
            second.element_result().selection()
        );
        assert_eq!(
            first.index_result().path().full_path(),
            "Person.tags.{index}"
        );
        assert_eq!(
            first.element_result().path().full_path(),
            "Person.tags.{element}"
        );
        assert!(first.is_selected());
        assert_eq!(first.result_alias(), Some("t"));
        assert_eq!(second.lock_mode(), LockMode::Read);
        assert!(matches!(first.index_result(), DomainResult::Basic(r) if r.kind == ValueKind::Int));
    }

    #[test]
    fn producer_rejects_key_of_other_role() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut state = SelectionCollector::new();
        let producer = descriptor
            .create_initializer_producer(
                &NavigablePath::root("Person").append("tags"),
                &FetchParent::new(NavigablePath::root("Person")),
                true,
                None,
                LockMode::None,
                &mut state,
            )
            .expect("producer");

        let key = crate::result::CollectionKey::new(
            CollectionRole::new("Person", "nicknames"),
            Value::Int(1),
        );

        assert!(producer.produce_initializer(key).is_err());
    }

    #[test]
    fn queued_ops_replay_after_initialization() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut list = PersistentList::<String>::uninitialized();
        list.push(Element::new("c".to_string()));
        list.insert(0, Element::new("z".to_string()));
        list.initialize(elements(&["a", "b"]));
        let mut collection: PersistentCollection<String> = list.into();

        let log = EventLog::default();
        let applied = with_metrics_sink(&log, || {
            descriptor.process_queued_ops(&mut collection, &Value::Int(7), &OpenSession)
        })
        .expect("replay should succeed");

        let list = collection.as_list().expect("list");
        assert_eq!(applied, 2);
        assert_eq!(texts(list), vec![Some("z"), Some("a"), Some("b"), Some("c")]);
        assert!(!list.has_queued_ops());
        assert!(list.is_dirty());
        assert_eq!(log.events.borrow().len(), 1);
        assert!(log.events.borrow()[0].contains("QueuedOpsReplayed"));
    }

    #[test]
    fn queued_ops_wait_for_initialization() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut list = PersistentList::<String>::uninitialized();
        list.push(Element::new("c".to_string()));
        let mut collection: PersistentCollection<String> = list.into();

        let applied = descriptor
            .process_queued_ops(&mut collection, &Value::Int(7), &OpenSession)
            .expect("uninitialized replay is a no-op");

        assert_eq!(applied, 0);
        assert_eq!(collection.as_list().map(|l| l.queued_ops().len()), Some(1));
    }

    #[test]
    fn failed_replay_changes_nothing() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut list = PersistentList::<String>::uninitialized();
        list.push(Element::new("c".to_string()));
        list.remove(9);
        list.initialize(elements(&["a"]));
        let mut collection: PersistentCollection<String> = list.into();

        let log = EventLog::default();
        let err = with_metrics_sink(&log, || {
            descriptor.process_queued_ops(&mut collection, &Value::Int(7), &OpenSession)
        })
        .expect_err("remove past the end should fail");

        let list = collection.as_list().expect("list");
        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert!(err.message.contains("Person.tags#7"));
        assert_eq!(texts(list), vec![Some("a")]);
        assert_eq!(list.queued_ops().len(), 2);
        assert!(log.events.borrow()[0].contains("ReplayFailed"));
    }

    #[test]
    fn closed_session_cannot_replay() {
        let descriptor = tags_descriptor(BootIndex::column("position"));
        let mut collection: PersistentCollection<String> =
            PersistentList::from_elements(elements(&["a"])).into();

        let err = descriptor
            .process_queued_ops(&mut collection, &Value::Int(7), &ClosedSession)
            .expect_err("closed session");

        assert!(err.message.contains("session#2 is closed"));
    }

    #[test]
    fn ignore_policy_leaves_log_untouched() {
        let mut config = RelmapConfig::default();
        config.collections.queued_ops = QueuedOpsPolicy::Ignore;
        let context = RuntimeModelCreationContext::new(config);
        let descriptor =
            tags_descriptor_with(&tags_property(BootIndex::column("position")), &context)
                .expect("descriptor should build");

        let mut list = PersistentList::<String>::uninitialized();
        list.push(Element::new("c".to_string()));
        list.initialize(elements(&["a"]));
        let mut collection: PersistentCollection<String> = list.into();

        let log = EventLog::default();
        let applied = with_metrics_sink(&log, || {
            descriptor.process_queued_ops(&mut collection, &Value::Int(7), &ClosedSession)
        })
        .expect("ignore is a no-op");

        assert_eq!(applied, 0);
        assert_eq!(collection.as_list().map(|l| l.queued_ops().len()), Some(1));
        assert!(log.events.borrow()[0].contains("pending: 1"));
    }

    #[test]
    fn disabled_metrics_record_nothing() {
        let mut config = RelmapConfig::default();
        config.metrics.enabled = false;
        let context = RuntimeModelCreationContext::new(config);

        let log = EventLog::default();
        with_metrics_sink(&log, || {
            let descriptor =
                tags_descriptor_with(&tags_property(BootIndex::column("position")), &context)
                    .expect("descriptor should build");
            let (list, handles) = tags_collection(&["a"]);
            descriptor.contains(&list, &handles[0]).expect("contains");
        });

        assert!(log.events.borrow().is_empty());
    }

    proptest! {
        #[test]
        fn contains_agrees_with_index_of(
            values in prop::collection::vec("[a-c]", 0..8),
            pick in any::<prop::sample::Index>(),
            fresh in any::<bool>(),
        ) {
            let descriptor = tags_descriptor(BootIndex::column("position"));
            let handles: Vec<Element<String>> =
                values.iter().cloned().map(Element::new).collect();
            let collection: PersistentCollection<String> =
                PersistentList::from_elements(handles.clone()).into();

            let candidate = if fresh || handles.is_empty() {
                Element::new("a".to_string())
            } else {
                handles[pick.index(handles.len())].clone()
            };

            let position = descriptor.index_of(&collection, &candidate).unwrap();
            let contained = descriptor.contains(&collection, &candidate).unwrap();

            prop_assert_eq!(contained, position.is_some());
            if let Some(position) = position {
                prop_assert!(handles[position].same_identity(&candidate));
                prop_assert!(!fresh);
            }
        }
    }
}
