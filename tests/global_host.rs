//! Process-wide configuration lifecycle.
//!
//! The global host can only be built once per process, so the whole
//! lifecycle is exercised from a single test.

#![allow(clippy::panic)]

use std::sync::{Arc, Barrier};
use std::thread;

use servicebus_bootstrap::configuration::{self, LifecycleState};
use servicebus_bootstrap::container::ContainerBuilder;
use servicebus_bootstrap::error::BusError;
use servicebus_bootstrap::registration::{SubscriberAssembly, SubscriberType};

struct OrderPlaced;
struct OrderShipped;

#[test]
fn global_configuration_lifecycle() {
    assert!(configuration::instance().is_none());
    assert_eq!(configuration::global().state(), LifecycleState::Unconfigured);

    assert!(matches!(
        configuration::with_container(None),
        Err(BusError::InvalidArgument(_))
    ));

    // Two callers racing the first acquisition share one draft.
    let barrier = Barrier::new(2);
    let (a, b) = thread::scope(|scope| {
        let a = scope.spawn(|| {
            barrier.wait();
            configuration::with_settings()
        });
        let b = scope.spawn(|| {
            barrier.wait();
            configuration::with_settings()
        });
        (a.join(), b.join())
    });
    let (Ok(Ok(a)), Ok(Ok(b))) = (a, b) else {
        panic!("acquisition failed");
    };
    assert!(a.shares_draft_with(&b));

    // Building without an application id fails and exposes nothing.
    assert!(matches!(a.build(), Err(BusError::Configuration(_))));
    assert!(configuration::instance().is_none());
    assert_eq!(configuration::global().state(), LifecycleState::Building);

    // The other builder still sees the draft and can finish the job.
    let assembly = SubscriberAssembly::new("orders")
        .with::<OrderPlaced>()
        .with::<OrderShipped>();
    let Ok(b) = b
        .with_application_id("app1")
        .register_assembly(&assembly)
        .and_then(|b| b.register_assembly(&assembly))
        .and_then(|b| b.register_subscriber(SubscriberType::of::<OrderPlaced>()))
    else {
        panic!("registration failed");
    };
    let Ok(config) = b.build() else {
        panic!("build failed");
    };

    assert_eq!(config.registered_assemblies().len(), 1);
    assert_eq!(config.registered_subscribers().len(), 2);
    assert_eq!(config.max_threads(), 1);
    assert_eq!(config.topic_name(), "pro_ext_topic");
    assert_eq!(config.default_serializer().content_type(), "application/json");
    assert_eq!(config.bus().endpoints().len(), 2);

    let Some(current) = configuration::instance() else {
        panic!("instance missing after build");
    };
    assert!(Arc::ptr_eq(&current, &config));
    assert_eq!(current.bus().id(), config.bus().id());

    // The configuration is terminal.
    assert!(matches!(
        configuration::with_settings(),
        Err(BusError::AlreadyConfigured)
    ));
    assert!(matches!(
        configuration::with_container(Some(ContainerBuilder::new())),
        Err(BusError::AlreadyConfigured)
    ));
    assert_eq!(configuration::global().state(), LifecycleState::Built);
}
