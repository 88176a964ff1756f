use super::*;
use cantine_protocols::testing::{MockElement, MockSurface};

const LOGIN_URL: &str = "https://monrestoco.centre-valdeloire.fr/auth/login";

fn quick_login_config() -> LoginConfig {
    LoginConfig {
        max_attempts: 3,
        initial_delay_ms: 50,
        settle_delay_ms: 20,
        element_timeout_ms: 300,
        verify_timeout_ms: 400,
        verify_poll_ms: 50,
        ..LoginConfig::default()
    }
}

fn driver() -> AutoLoginDriver {
    AutoLoginDriver::new(quick_login_config(), PortalConfig::default())
}

fn credentials() -> Credentials {
    Credentials::new("parent@example.org", "s3cret")
}

fn form_elements(surface: &MockSurface) -> (Arc<MockElement>, Arc<MockElement>, Arc<MockElement>) {
    let config = LoginConfig::default();
    let username = MockElement::visible();
    let password = MockElement::visible();
    let submit = MockElement::visible();
    surface.add_element(&config.username_selector, username.clone());
    surface.add_element(&config.password_selector, password.clone());
    surface.add_element(&config.submit_selector, submit.clone());
    (username, password, submit)
}

#[tokio::test(start_paused = true)]
async fn test_successful_login() {
    let surface = MockSurface::new(LOGIN_URL);
    let (username, password, submit) = form_elements(&surface);

    // Submitting redirects to the landing page.
    let url_slot = surface.url_slot();
    let landing = PortalConfig::default().landing_url();
    submit.on_click(move || *url_slot.lock() = landing.clone());

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::Verified);
    assert_eq!(username.current_value(), "parent@example.org");
    assert_eq!(password.current_value(), "s3cret");
    assert_eq!(submit.click_count(), 1);
    assert_eq!(
        username.dispatched_events(),
        vec![SyntheticEvent::Input, SyntheticEvent::Change]
    );
}

#[tokio::test(start_paused = true)]
async fn test_profile_selection_reveals_form() {
    let surface = MockSurface::new(LOGIN_URL);
    let config = LoginConfig::default();

    let username = MockElement::hidden();
    let password = MockElement::hidden();
    let submit = MockElement::hidden();
    surface.add_element(&config.username_selector, username.clone());
    surface.add_element(&config.password_selector, password.clone());
    surface.add_element(&config.submit_selector, submit.clone());

    // The form only renders after the role-selection click.
    let profile = MockElement::visible();
    {
        let (username, password, submit) = (username.clone(), password.clone(), submit.clone());
        profile.on_click(move || {
            username.set_visible(true);
            password.set_visible(true);
            submit.set_visible(true);
        });
    }
    surface.add_element(&config.profile_selector, profile.clone());

    let url_slot = surface.url_slot();
    let landing = PortalConfig::default().landing_url();
    submit.on_click(move || *url_slot.lock() = landing.clone());

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::Verified);
    assert_eq!(profile.click_count(), 1);
    assert_eq!(submit.click_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_when_form_never_appears() {
    let surface = MockSurface::new(LOGIN_URL);

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::GivenUp);
    assert!(surface.navigations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_already_authenticated_page_verifies_immediately() {
    let surface = MockSurface::new(PortalConfig::default().landing_url());

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::Verified);
}

#[tokio::test(start_paused = true)]
async fn test_cleared_form_is_never_submitted() {
    let surface = MockSurface::new(LOGIN_URL);
    let (_username, password, submit) = form_elements(&surface);

    // The page wipes the password field on its own validation pass.
    password.wipe();

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::GivenUp);
    assert_eq!(submit.click_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_navigation_after_verify_timeout() {
    let surface = MockSurface::new(LOGIN_URL);
    let (_username, _password, submit) = form_elements(&surface);
    // Submit never redirects; the watch must time out and navigate.

    let driver = driver();
    let state = driver.run(&surface, &credentials()).await;

    assert_eq!(state, LoginState::Verified);
    assert_eq!(submit.click_count(), 1);
    assert_eq!(
        surface.navigations(),
        vec![PortalConfig::default().landing_url()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_mutation_wakes_driver_before_backoff() {
    let surface = std::sync::Arc::new(MockSurface::new(LOGIN_URL));
    // Backoff so long that only the mutation arm can re-enter in time.
    let driver = std::sync::Arc::new(AutoLoginDriver::new(
        LoginConfig {
            initial_delay_ms: 60_000,
            max_delay_ms: 120_000,
            settle_delay_ms: 20,
            element_timeout_ms: 300,
            verify_timeout_ms: 400,
            verify_poll_ms: 50,
            ..LoginConfig::default()
        },
        PortalConfig::default(),
    ));

    let started = tokio::time::Instant::now();
    let running = {
        let driver = driver.clone();
        let surface = surface.clone();
        let creds = credentials();
        tokio::spawn(async move { driver.run(surface.as_ref(), &creds).await })
    };

    // Let the first attempt fail against an empty document, then render
    // the form and signal the change.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let (_username, _password, submit) = form_elements(&surface);
    let url_slot = surface.url_slot();
    let landing = PortalConfig::default().landing_url();
    submit.on_click(move || *url_slot.lock() = landing.clone());
    surface.emit_mutation();

    let state = running.await.unwrap();
    assert_eq!(state, LoginState::Verified);
    assert_eq!(submit.click_count(), 1);
    assert!(
        started.elapsed() < Duration::from_millis(60_000),
        "re-entry must come from the mutation, not the backoff timer"
    );
}

#[tokio::test(start_paused = true)]
async fn test_mutations_during_attempt_cause_no_second_fill() {
    let surface = std::sync::Arc::new(MockSurface::new(LOGIN_URL));
    let (username, password, submit) = form_elements(&surface);

    let url_slot = surface.url_slot();
    let landing = PortalConfig::default().landing_url();
    submit.on_click(move || *url_slot.lock() = landing.clone());

    // Fire mutations continuously while the attempt fills and submits.
    let noise = {
        let surface = surface.clone();
        tokio::spawn(async move {
            loop {
                surface.emit_mutation();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
    };

    let driver = driver();
    let state = driver.run(surface.as_ref(), &credentials()).await;
    noise.abort();

    assert_eq!(state, LoginState::Verified);
    assert_eq!(submit.click_count(), 1);
    assert_eq!(
        username.dispatched_events(),
        vec![SyntheticEvent::Input, SyntheticEvent::Change],
        "the fields must be filled exactly once"
    );
    assert_eq!(
        password.dispatched_events(),
        vec![SyntheticEvent::Input, SyntheticEvent::Change]
    );
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_attempts_are_rejected() {
    let surface = std::sync::Arc::new(MockSurface::new(LOGIN_URL));
    let driver = std::sync::Arc::new(driver());
    let creds = credentials();

    // First attempt holds the guard while polling for the absent form;
    // a concurrent invocation must bounce off with the current state.
    let background = {
        let driver = driver.clone();
        let surface = surface.clone();
        let creds = creds.clone();
        tokio::spawn(async move { driver.attempt_once(surface.as_ref(), &creds).await })
    };
    tokio::task::yield_now().await;

    let state = driver.attempt_once(surface.as_ref(), &creds).await;
    assert!(matches!(
        state,
        LoginState::Idle | LoginState::AwaitingFields
    ));

    background.await.unwrap();
}
