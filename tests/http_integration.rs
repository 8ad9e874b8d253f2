// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP API using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crestron_lights::protocol::{HttpClient, Protocol, api};
use crestron_lights::subscription::{CallbackRegistry, Subscribable};
use crestron_lights::types::{DeviceDescriptor, LightState};
use crestron_lights::{
    ConnectionContext, DirectoryPoller, Error, Light, LightPlatform, Operation, ParseError,
    PollingConfig, ProtocolError,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH_KEY: &str = "test-auth-key";

fn context_for(mock_server: &MockServer) -> ConnectionContext {
    ConnectionContext::new(mock_server.uri(), AUTH_KEY).with_timeout(Duration::from_secs(5))
}

fn client_for(mock_server: &MockServer) -> Arc<HttpClient> {
    Arc::new(HttpClient::new(context_for(mock_server)).unwrap())
}

/// Points at a port nothing listens on.
fn unreachable_client() -> Arc<HttpClient> {
    let context =
        ConnectionContext::new("http://127.0.0.1:9", AUTH_KEY).with_timeout(Duration::from_secs(2));
    Arc::new(HttpClient::new(context).unwrap())
}

fn kitchen(client: Arc<HttpClient>) -> Light<HttpClient> {
    Light::new(
        DeviceDescriptor::new("L1", "Kitchen"),
        client,
        Arc::new(CallbackRegistry::new()),
    )
}

/// Counts state change notifications emitted by a light.
fn count_notifications(light: &Light<HttpClient>) -> Arc<AtomicU32> {
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();
    light.on_state_changed(move |_change| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });
    counter
}

async fn mount_directory(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api::LIGHTS_PATH))
        .and(header(api::AUTH_HEADER, AUTH_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn get_sends_auth_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cws/api/lights"))
            .and(header("Crestron-RestAPI-AuthKey", AUTH_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"lights": []}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let response = client.get(api::LIGHTS_PATH).await.unwrap();
        assert_eq!(response.body(), r#"{"lights": []}"#);
    }

    #[tokio::test]
    async fn post_uses_post_method() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/off"))
            .and(header("Crestron-RestAPI-AuthKey", AUTH_KEY))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client.post(&api::light_off_path("L1")).await.unwrap();
    }

    #[tokio::test]
    async fn non_200_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.post(&api::light_on_path("L1")).await.unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    #[tokio::test]
    async fn unauthorized_is_reported_with_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.get(api::LIGHTS_PATH).await.unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedStatus { status: 401, .. }
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_an_http_error() {
        let client = unreachable_client();
        let err = client.get(api::LIGHTS_PATH).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Http(_)));
        assert_eq!(err.status(), None);
    }
}

// ============================================================================
// Directory Poller Tests
// ============================================================================

mod directory_poller {
    use super::*;

    fn poller_for(mock_server: &MockServer) -> DirectoryPoller<HttpClient> {
        DirectoryPoller::new(client_for(mock_server), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn empty_before_first_poll() {
        let mock_server = MockServer::start().await;
        let poller = poller_for(&mock_server);

        assert!(poller.current_devices().is_empty());
        assert_eq!(poller.interval(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn successful_poll_stores_lights_in_order() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({
                "lights": [
                    {"id": "L2", "name": "Den", "level": 0},
                    {"id": "L1", "name": "Kitchen", "level": 65535}
                ]
            }),
        )
        .await;

        let poller = poller_for(&mock_server);
        let fetched = poller.refresh().await.unwrap();

        let expected = vec![
            DeviceDescriptor::new("L2", "Den"),
            DeviceDescriptor::new("L1", "Kitchen"),
        ];
        assert_eq!(fetched, expected);
        assert_eq!(poller.current_devices(), expected);
        assert!(poller.last_update_success());
    }

    #[tokio::test]
    async fn failed_poll_keeps_previous_list() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L1", "name": "Kitchen"}]}),
        )
        .await;

        let poller = poller_for(&mock_server);
        poller.refresh().await.unwrap();
        let before = poller.current_devices();

        mock_server.reset().await;
        Mock::given(method("GET"))
            .and(path(api::LIGHTS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = poller.refresh().await.unwrap_err();
        assert!(matches!(err, Error::UpdateFailed { .. }));
        assert_eq!(poller.current_devices(), before);
        assert!(!poller.last_update_success());
    }

    #[tokio::test]
    async fn malformed_body_keeps_previous_list() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L1", "name": "Kitchen"}]}),
        )
        .await;

        let poller = poller_for(&mock_server);
        poller.refresh().await.unwrap();

        mock_server.reset().await;
        Mock::given(method("GET"))
            .and(path(api::LIGHTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&mock_server)
            .await;

        assert!(poller.refresh().await.is_err());
        assert_eq!(
            poller.current_devices(),
            vec![DeviceDescriptor::new("L1", "Kitchen")]
        );
    }

    #[tokio::test]
    async fn failure_listener_is_notified() {
        let poller = DirectoryPoller::new(unreachable_client(), Duration::from_secs(30));
        let failures = Arc::new(AtomicU32::new(0));
        let failures_clone = failures.clone();
        poller.on_update_failed(move |_err| {
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(poller.refresh().await.is_err());
        assert!(poller.current_devices().is_empty());
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(poller.status().last_error.is_some());
    }

    #[tokio::test]
    async fn update_listener_receives_new_list() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L9", "name": "Garage"}]}),
        )
        .await;

        let poller = poller_for(&mock_server);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        poller.on_updated(move |lights| {
            let _ = tx.send(lights.to_vec());
        });

        poller.refresh().await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received, vec![DeviceDescriptor::new("L9", "Garage")]);
    }
}

// ============================================================================
// Light Controller Tests
// ============================================================================

mod light_controller {
    use super::*;

    #[tokio::test]
    async fn new_light_is_unknown_and_not_on() {
        let mock_server = MockServer::start().await;
        let light = kitchen(client_for(&mock_server));

        assert_eq!(light.identifier(), "L1");
        assert_eq!(light.name(), "Kitchen");
        assert!(!light.is_on());
        assert_eq!(light.state(), LightState::Unknown);
    }

    #[tokio::test]
    async fn turn_on_success_sets_on() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .and(header(api::AUTH_HEADER, AUTH_KEY))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        let notifications = count_notifications(&light);

        light.turn_on().await.unwrap();

        assert!(light.is_on());
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn turn_on_server_error_keeps_state_and_reports() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        let notifications = count_notifications(&light);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        light.on_command_failed(move |failure| {
            let _ = tx.send(failure.clone());
        });

        let err = light.turn_on().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedStatus { status: 500, .. })
        ));
        assert!(!light.is_on());
        assert_eq!(light.state(), LightState::Unknown);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);

        let failure = rx.recv().await.unwrap();
        assert_eq!(failure.light_id, "L1");
        assert_eq!(failure.operation, Operation::TurnOn);
    }

    #[tokio::test]
    async fn turn_on_twice_stays_on() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));

        light.turn_on().await.unwrap();
        assert!(light.is_on());
        light.turn_on().await.unwrap();
        assert!(light.is_on());
    }

    #[tokio::test]
    async fn turn_off_success_sets_off() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/off"))
            .and(header(api::AUTH_HEADER, AUTH_KEY))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        light.turn_on().await.unwrap();
        light.turn_off().await.unwrap();

        assert!(!light.is_on());
        assert_eq!(light.state(), LightState::Off);
    }

    #[tokio::test]
    async fn turn_off_failure_keeps_on() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/off"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        light.turn_on().await.unwrap();

        assert!(light.turn_off().await.is_err());
        assert!(light.is_on());
    }

    #[tokio::test]
    async fn refresh_state_on_notifies_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cws/api/lights/L1"))
            .and(header(api::AUTH_HEADER, AUTH_KEY))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "on"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        light.on_state_changed(move |change| {
            let _ = tx.send(change.clone());
        });

        let state = light.refresh_state().await.unwrap();

        assert_eq!(state, LightState::On);
        assert!(light.is_on());

        let change = rx.recv().await.unwrap();
        assert_eq!(change.light_id, "L1");
        assert_eq!(change.previous, LightState::Unknown);
        assert_eq!(change.state, LightState::On);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_state_other_values_are_off() {
        for value in ["off", "standby", "ON"] {
            let mock_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/cws/api/lights/L1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": value})),
                )
                .mount(&mock_server)
                .await;

            let light = kitchen(client_for(&mock_server));
            light.refresh_state().await.unwrap();

            assert!(!light.is_on(), "state {value:?} should map to off");
            assert_eq!(light.state(), LightState::Off);
        }
    }

    #[tokio::test]
    async fn refresh_state_missing_field_keeps_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cws/api/lights/L1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"level": 100})),
            )
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        let notifications = count_notifications(&light);

        let err = light.refresh_state().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MissingField(ref field)) if field == "state"
        ));
        assert_eq!(light.state(), LightState::Unknown);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_refresh_does_not_overwrite_later_command() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cws/api/lights/L1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"state": "off"}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));
        let notifications = count_notifications(&light);

        let refresh = tokio::spawn({
            let light = light.clone();
            async move { light.refresh_state().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        light.turn_on().await.unwrap();
        assert!(light.is_on());

        let refreshed = refresh.await.unwrap().unwrap();
        assert_eq!(refreshed, LightState::On);
        assert!(light.is_on());
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_issued_after_slow_command_wins() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cws/api/lights/L1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "off"})),
            )
            .mount(&mock_server)
            .await;

        let light = kitchen(client_for(&mock_server));

        let command = tokio::spawn({
            let light = light.clone();
            async move { light.turn_on().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(light.refresh_state().await.unwrap(), LightState::Off);

        command.await.unwrap().unwrap();
        assert_eq!(light.state(), LightState::Off);
    }

    #[tokio::test]
    async fn transport_failure_keeps_state() {
        let light = kitchen(unreachable_client());

        assert!(light.turn_on().await.is_err());
        assert!(light.refresh_state().await.is_err());
        assert_eq!(light.state(), LightState::Unknown);
    }

    #[tokio::test]
    async fn one_light_failing_does_not_affect_another() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L1/on"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L2/on"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let callbacks = Arc::new(CallbackRegistry::new());
        let first = Light::new(
            DeviceDescriptor::new("L1", "Kitchen"),
            client.clone(),
            callbacks.clone(),
        );
        let second = Light::new(DeviceDescriptor::new("L2", "Den"), client, callbacks);

        let (a, b) = tokio::join!(first.turn_on(), second.turn_on());

        assert!(a.is_err());
        assert!(b.is_ok());
        assert_eq!(first.state(), LightState::Unknown);
        assert!(second.is_on());
    }
}

// ============================================================================
// Light Platform Tests
// ============================================================================

mod light_platform {
    use super::*;

    #[tokio::test]
    async fn setup_binds_one_light_per_entry() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L1", "name": "Kitchen"}]}),
        )
        .await;

        let platform = LightPlatform::setup(context_for(&mock_server), PollingConfig::default())
            .await
            .unwrap();

        assert_eq!(platform.lights().len(), 1);
        let light = platform.light("L1").unwrap();
        assert_eq!(light.identifier(), "L1");
        assert_eq!(light.name(), "Kitchen");
        assert!(!light.is_on());
        assert!(platform.light("L2").is_none());
        assert!(!platform.is_running());
    }

    #[tokio::test]
    async fn setup_with_failed_directory_has_no_lights() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(api::LIGHTS_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let platform = LightPlatform::setup(context_for(&mock_server), PollingConfig::default())
            .await
            .unwrap();

        assert!(platform.lights().is_empty());
        assert!(!platform.poller().last_update_success());
    }

    #[tokio::test]
    async fn setup_rejects_invalid_context() {
        let result = LightPlatform::setup(
            ConnectionContext::new("crestron.local", AUTH_KEY),
            PollingConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn lights_are_bound_once() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L1", "name": "Kitchen"}]}),
        )
        .await;

        let platform = LightPlatform::setup(context_for(&mock_server), PollingConfig::default())
            .await
            .unwrap();

        mock_server.reset().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [
                {"id": "L1", "name": "Kitchen"},
                {"id": "L2", "name": "Den"}
            ]}),
        )
        .await;

        platform.poller().refresh().await.unwrap();

        assert_eq!(platform.poller().current_devices().len(), 2);
        assert_eq!(platform.lights().len(), 1);
    }

    #[tokio::test]
    async fn started_platform_polls_light_state() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [{"id": "L1", "name": "Kitchen"}]}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/cws/api/lights/L1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"state": "on"})),
            )
            .mount(&mock_server)
            .await;

        let mut platform =
            LightPlatform::setup(context_for(&mock_server), PollingConfig::default())
                .await
                .unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        platform.on_state_changed(move |change| {
            let _ = tx.send(change.clone());
        });

        platform.start();
        assert!(platform.is_running());

        let change = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("state poll should fire immediately")
            .unwrap();
        assert_eq!(change.state, LightState::On);
        assert!(platform.light("L1").unwrap().is_on());

        platform.shutdown().await;
        assert!(!platform.is_running());
    }

    #[tokio::test]
    async fn platform_subscription_sees_commands() {
        let mock_server = MockServer::start().await;
        mount_directory(
            &mock_server,
            serde_json::json!({"lights": [
                {"id": "L1", "name": "Kitchen"},
                {"id": "L2", "name": "Den"}
            ]}),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/cws/api/lights/L2/off"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let platform = LightPlatform::setup(context_for(&mock_server), PollingConfig::default())
            .await
            .unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let id = platform.on_state_changed(move |change| {
            let _ = tx.send(change.light_id.clone());
        });

        platform.light("L2").unwrap().turn_off().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "L2");

        assert!(platform.unsubscribe(id));
    }
}
