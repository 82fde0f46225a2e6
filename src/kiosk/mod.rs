//! Kiosk
//!
//! Wires user actions to the camera, the recognition API, the record
//! collections and the status line. Every action ends with a status
//! message; errors never escape to the caller.
//!
//! ## Actions
//!
//! - **Capture**: match the current frame and mark attendance
//! - **Register**: validate the form and register the current frame
//! - **My attendance**: one employee's records, stats and export
//! - **Attendance**: everyone's records (passkey gated), search and export
//! - **Settings**: load, edit and persist preferences

mod clock;
mod keys;
pub mod validation;

pub use clock::{format_clock, Clock};
pub use keys::{Action, Focus, KeyEvent};
pub use validation::{employee_id_hint, FieldHint, ValidationError};

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::camera::{Camera, Constraints, Facing, FrameSource};
use crate::client::{AttendanceApi, ClientError, RegistrationRequest};
use crate::config::Config;
use crate::presenter::{ActivityKind, LoadingOverlay, RecentActivity, StatusPresenter};
use crate::records::{
    demo, render, Admin, AdminStats, DateFilter, Personal, PersonalStats, Provenance,
    RecordView, RecordsError, RecordsResult, Role,
};
use crate::session::SessionState;
use crate::settings::{Appearance, PreferenceStore, Settings};
use crate::sound::{AudioOutput, Notifier, Outcome};

pub const ALREADY_PROCESSING: &str = "Already processing, please wait...";
pub const CAPTURE_FAILED: &str = "Image capture failed. Please try again.";
pub const CAMERA_DENIED: &str = "Camera access denied. Please allow camera access.";
pub const NO_MATCH: &str = "No face match found. Please register first.";
pub const SETTINGS_SAVED: &str = "Settings saved successfully";

/// How long the registration dialog stays up after a success
pub const REGISTRATION_CLOSE_DELAY: Duration = Duration::from_secs(2);

/// A dialog on top of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modal {
    Registration,
    MyAttendance,
    Attendance,
    Settings,
}

/// Header, stats and list for the self-service view
#[derive(Debug, Clone, Serialize)]
pub struct PersonalDashboard {
    pub title: String,
    pub employee_id: String,
    pub last_updated: String,
    pub provenance: Provenance,
    pub stats: PersonalStats,
    pub view: RecordView,
}

/// Stats and list for the admin view
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub provenance: Provenance,
    pub stats: AdminStats,
    pub view: RecordView,
}

/// What a shortcut did
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    pub action: Action,
    /// Results for Enter in the search field
    pub view: Option<RecordView>,
}

/// Disables a control until dropped
struct ControlGuard<'a> {
    enabled: &'a AtomicBool,
}

impl<'a> ControlGuard<'a> {
    fn disable(enabled: &'a AtomicBool) -> Self {
        enabled.store(false, Ordering::Release);
        Self { enabled }
    }
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::Release);
    }
}

/// The attendance kiosk
pub struct Kiosk {
    config: Config,
    api: Arc<dyn AttendanceApi>,
    camera: Option<Camera>,
    session: SessionState,
    presenter: StatusPresenter,
    loading: LoadingOverlay,
    notifier: Notifier,
    store: Mutex<Box<dyn PreferenceStore>>,
    settings: RwLock<Settings>,
    appearance: Appearance,
    activity: RecentActivity,
    modals: Arc<Mutex<BTreeSet<Modal>>>,
    capture_enabled: AtomicBool,
    register_enabled: AtomicBool,
    rng: Mutex<fastrand::Rng>,
}

impl Kiosk {
    /// Create a kiosk and apply the stored preferences.
    ///
    /// No camera is attached yet; see [`Kiosk::attach_camera`].
    pub fn new(
        config: Config,
        api: Arc<dyn AttendanceApi>,
        store: Box<dyn PreferenceStore>,
        audio: Option<Box<dyn AudioOutput>>,
    ) -> Self {
        let settings = Settings::load(store.as_ref());
        let appearance = Appearance::new();
        appearance.apply(&settings);

        Self {
            config,
            api,
            camera: None,
            session: SessionState::new(),
            presenter: StatusPresenter::new(settings.auto_hide),
            loading: LoadingOverlay::new(),
            notifier: Notifier::new(audio, settings.sound_enabled),
            store: Mutex::new(store),
            settings: RwLock::new(settings),
            appearance,
            activity: RecentActivity::new(),
            modals: Arc::new(Mutex::new(BTreeSet::new())),
            capture_enabled: AtomicBool::new(true),
            register_enabled: AtomicBool::new(true),
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Seed the generator behind demo data
    pub fn with_demo_seed(self, seed: u64) -> Self {
        *self.rng.lock().unwrap_or_else(|e| e.into_inner()) = fastrand::Rng::with_seed(seed);
        self
    }

    /// Acquire the camera. On denial the capture and registration controls
    /// are disabled and an error status is shown.
    pub fn attach_camera(&mut self, source: Box<dyn FrameSource>) -> bool {
        self.presenter.info("Initializing camera...");

        let constraints = Constraints {
            ideal_width: self.config.camera.ideal_width,
            ideal_height: self.config.camera.ideal_height,
            facing: Facing::User,
        };

        match Camera::acquire(source, constraints) {
            Ok(camera) => {
                self.camera = Some(camera);
                self.capture_enabled.store(true, Ordering::Release);
                self.register_enabled.store(true, Ordering::Release);
                self.presenter
                    .success("Camera ready - You can now capture attendance");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Camera access error");
                self.camera = None;
                self.capture_enabled.store(false, Ordering::Release);
                self.register_enabled.store(false, Ordering::Release);
                self.presenter.error(CAMERA_DENIED);
                false
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn presenter(&self) -> &StatusPresenter {
        &self.presenter
    }

    pub fn loading(&self) -> &LoadingOverlay {
        &self.loading
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn activity(&self) -> &RecentActivity {
        &self.activity
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn capture_enabled(&self) -> bool {
        self.capture_enabled.load(Ordering::Acquire)
    }

    pub fn register_enabled(&self) -> bool {
        self.register_enabled.load(Ordering::Acquire)
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&modal)
    }

    pub fn open_modals(&self) -> Vec<Modal> {
        self.modals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect()
    }

    /// Current time in the display zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.config.display.zone())
    }

    fn zone(&self) -> FixedOffset {
        self.config.display.zone()
    }

    fn open_modal(&self, modal: Modal) {
        self.modals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(modal);
    }

    /// Base64 JPEG of the current frame, if it passes the size heuristic
    fn capture_image(&self) -> Option<String> {
        let camera = self.camera.as_ref()?;
        let quality = self.settings().camera_quality;

        match camera.image_data(quality) {
            Ok(Some(image)) if image.len() >= self.config.camera.min_image_size => Some(image),
            Ok(Some(image)) => {
                tracing::warn!(len = image.len(), "Captured image too small");
                None
            }
            Ok(None) => {
                tracing::warn!("Camera has no decoded frame yet");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Frame encoding failed");
                None
            }
        }
    }

    fn network_error(&self, e: &ClientError) {
        tracing::error!(error = ?e, "Recognition API call failed");
        self.presenter
            .error(format!("Network error: {}. Check logs for details.", e));
    }

    /// Match the current frame and mark attendance
    pub async fn capture_attendance(&self) {
        let Some(_guard) = self.session.try_begin() else {
            self.presenter.warning(ALREADY_PROCESSING);
            return;
        };

        let Some(image) = self.capture_image() else {
            self.presenter.error(CAPTURE_FAILED);
            return;
        };

        let _control = ControlGuard::disable(&self.capture_enabled);
        let _loading = self.loading.show("Processing attendance...");
        self.presenter.info("Processing attendance...");

        match self.api.capture(&image).await {
            Ok(response) => match response.matched_name() {
                Some(name) => {
                    let similarity = response.similarity.unwrap_or(0.0).round() as i64;
                    tracing::info!(name, similarity, "Attendance marked");
                    self.presenter.success(format!(
                        "✅ Attendance marked for {}\n🎯 Confidence: {}%\n🕒 {}",
                        name,
                        similarity,
                        response.timestamp.as_deref().unwrap_or_default()
                    ));
                    self.activity.push(
                        name,
                        ActivityKind::Attendance,
                        render::format_datetime_24h(self.now()),
                    );
                    self.notifier.notify(Outcome::Success);
                }
                None => {
                    tracing::info!("No face match");
                    self.presenter.error(format!(
                        "❌ {}",
                        response.message.as_deref().unwrap_or(NO_MATCH)
                    ));
                    self.notifier.notify(Outcome::Failure);
                }
            },
            Err(e) => self.network_error(&e),
        }
    }

    pub fn open_registration(&self) {
        self.open_modal(Modal::Registration);
    }

    /// Validate the registration form and register the current frame
    pub async fn register_face(&self, passkey: &str, name: &str, employee_id: &str) {
        let Some(_guard) = self.session.try_begin() else {
            self.presenter.warning(ALREADY_PROCESSING);
            return;
        };

        let form = match validation::validate_registration(
            passkey,
            name,
            employee_id,
            &self.config.access.passkeys,
        ) {
            Ok(form) => form,
            Err(e) => {
                tracing::debug!(field = ?e, "Registration form rejected");
                self.presenter.error(e.message());
                return;
            }
        };

        let Some(image) = self.capture_image() else {
            self.presenter.error(CAPTURE_FAILED);
            return;
        };

        let _control = ControlGuard::disable(&self.register_enabled);
        let _loading = self.loading.show("Registering face...");
        self.presenter.info("Registering face...");

        let request = RegistrationRequest {
            image,
            name: form.name.clone(),
            employee_id: form.employee_id.clone(),
            passkey: form.passkey,
        };

        match self.api.register(&request).await {
            Ok(response) if response.success => {
                tracing::info!(name = %form.name, employee_id = %form.employee_id, "Face registered");
                self.presenter.success(format!(
                    "✅ Face registered successfully for {}\n🆔 Employee ID: {}\n🕒 {}",
                    form.name,
                    form.employee_id,
                    response.timestamp.as_deref().unwrap_or_default()
                ));
                self.activity.push(
                    format!("{} ({})", form.name, form.employee_id),
                    ActivityKind::Registration,
                    render::format_datetime_24h(self.now()),
                );
                self.notifier.notify(Outcome::Success);
                self.close_registration_later();
            }
            Ok(response) => {
                let message = response.message.unwrap_or_default();
                if message.contains("already") {
                    self.presenter
                        .warning(format!("⚠️ Face already registered!\n{}", message));
                } else {
                    let reason = if message.is_empty() {
                        "Unknown error"
                    } else {
                        message.as_str()
                    };
                    self.presenter
                        .error(format!("❌ Registration failed: {}", reason));
                }
            }
            Err(e) => self.network_error(&e),
        }
    }

    fn close_registration_later(&self) {
        let modals = Arc::clone(&self.modals);
        tokio::spawn(async move {
            tokio::time::sleep(REGISTRATION_CLOSE_DELAY).await;
            modals
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&Modal::Registration);
        });
    }

    /// Open the self-service dialog with an empty lookup.
    ///
    /// The admin view closes and drops its records.
    pub async fn open_my_attendance(&self) {
        self.close(Modal::Attendance).await;
        self.open_modal(Modal::MyAttendance);
        self.session.employee().write().await.clear();
    }

    /// Fetch one employee's records, falling back to demo data on failure
    pub async fn load_my_attendance(&self, employee_id: &str) {
        let employee_id = match validation::check_employee_id(employee_id) {
            Ok(id) => id,
            Err(e) => {
                self.presenter.error(e.message());
                return;
            }
        };

        self.open_modal(Modal::MyAttendance);
        let _loading = self.loading.show("Loading your attendance records...");
        self.presenter.info("Loading your attendance records...");

        match self.api.get_employee_attendance(&employee_id).await {
            Ok(response) if response.success => {
                let count = response.records.len();
                self.session.employee().write().await.load_for(
                    employee_id.as_str(),
                    response.records,
                    Provenance::Live,
                );
                self.presenter.success(format!(
                    "✅ Loaded {} attendance records for {}",
                    count, employee_id
                ));
            }
            Ok(response) => {
                let message = response.message.unwrap_or_default();
                if message.contains("not found") {
                    self.presenter.error(format!(
                        "❌ No records found for Employee ID: {}",
                        employee_id
                    ));
                } else if message.is_empty() {
                    self.presenter.error("❌ Failed to load records");
                } else {
                    self.presenter.error(format!("❌ {}", message));
                }
            }
            Err(e) if self.config.records.demo_fallback => {
                tracing::warn!(error = %e, employee_id = %employee_id, "Employee query failed, using demo data");
                let records = {
                    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                    demo::personal_records(&mut rng, &employee_id, self.now())
                };
                let count = records.len();
                self.session.employee().write().await.load_for(
                    employee_id.as_str(),
                    records,
                    Provenance::Demo,
                );
                self.presenter.success(format!(
                    "✅ Loaded {} records for {} (demo data)",
                    count, employee_id
                ));
            }
            Err(e) => {
                self.session.employee().write().await.clear();
                self.network_error(&e);
            }
        }
    }

    /// The self-service view, once a lookup has loaded
    pub async fn personal_dashboard(&self, filter: DateFilter) -> Option<PersonalDashboard> {
        let collection = self.session.employee().read().await;
        let employee_id = collection.owner()?.to_string();
        let now = self.now();

        Some(PersonalDashboard {
            title: format!("Employee Dashboard - {}", employee_id),
            last_updated: collection
                .loaded_at()
                .map(|at| render::format_datetime_24h(at.with_timezone(&self.zone())))
                .unwrap_or_default(),
            provenance: collection.provenance(),
            stats: collection.stats(now, self.config.records.working_days_per_month),
            view: collection.filtered_view(filter, now),
            employee_id,
        })
    }

    /// Filter the self-service list
    pub async fn filter_personal(&self, filter: DateFilter) -> RecordView {
        self.session
            .employee()
            .read()
            .await
            .filtered_view(filter, self.now())
    }

    pub fn open_attendance(&self) {
        self.open_modal(Modal::Attendance);
    }

    /// Fetch everyone's records, falling back to demo data on failure
    pub async fn load_attendance(&self, passkey: &str) {
        if let Err(e) = validation::check_passkey(passkey, &self.config.access.passkeys) {
            self.presenter.error(e.message());
            return;
        }

        self.open_modal(Modal::Attendance);
        let _loading = self.loading.show("Loading all attendance records...");
        self.presenter.info("Loading attendance records...");

        match self.api.get_attendance(passkey.trim()).await {
            Ok(response) if response.success => {
                let count = response.records.len();
                self.session
                    .attendance()
                    .write()
                    .await
                    .load(response.records, Provenance::Live);
                self.presenter
                    .success(format!("✅ Loaded {} attendance records", count));
            }
            Ok(response) => {
                self.presenter.error(format!(
                    "❌ Failed to load records: {}",
                    response.message.as_deref().unwrap_or("Unknown error")
                ));
            }
            Err(e) if self.config.records.demo_fallback => {
                tracing::warn!(error = %e, "Attendance query failed, using demo data");
                let records = {
                    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                    demo::admin_records(&mut rng, self.now())
                };
                let count = records.len();
                self.session
                    .attendance()
                    .write()
                    .await
                    .load(records, Provenance::Demo);
                self.presenter
                    .success(format!("✅ Loaded {} records (demo data)", count));
            }
            Err(e) => {
                self.session.attendance().write().await.clear();
                self.network_error(&e);
            }
        }
    }

    /// The admin view with its summary cards
    pub async fn admin_dashboard(&self, filter: DateFilter) -> AdminDashboard {
        let collection = self.session.attendance().read().await;
        let now = self.now();

        AdminDashboard {
            provenance: collection.provenance(),
            stats: collection.stats(now),
            view: collection.filtered_view(filter, now),
        }
    }

    /// Filter the admin list
    pub async fn filter_records(&self, filter: DateFilter) -> RecordView {
        self.session
            .attendance()
            .read()
            .await
            .filtered_view(filter, self.now())
    }

    /// Search the admin list by name or employee id
    pub async fn search_records(&self, term: &str) -> RecordView {
        self.session
            .attendance()
            .read()
            .await
            .search_view(term, self.zone())
    }

    /// Export the full admin list
    pub async fn export_all(&self) -> Option<PathBuf> {
        let result = self
            .session
            .attendance()
            .read()
            .await
            .export(Path::new(&self.config.records.export_dir), self.now());
        self.finish_export::<Admin>(result)
    }

    /// Export the full self-service list
    pub async fn export_personal(&self) -> Option<PathBuf> {
        let result = self
            .session
            .employee()
            .read()
            .await
            .export(Path::new(&self.config.records.export_dir), self.now());
        self.finish_export::<Personal>(result)
    }

    fn finish_export<R: Role>(&self, result: RecordsResult<PathBuf>) -> Option<PathBuf> {
        match result {
            Ok(path) => {
                self.presenter.success(R::EXPORT_SUCCESS_MESSAGE);
                Some(path)
            }
            Err(RecordsError::NothingToExport) => {
                self.presenter.error(R::EMPTY_EXPORT_MESSAGE);
                None
            }
            Err(e) => {
                tracing::error!(role = R::LABEL, error = %e, "Export failed");
                self.presenter.error(format!("Export failed: {}", e));
                None
            }
        }
    }

    /// Open the settings dialog with the stored preferences
    pub fn open_settings(&self) -> Settings {
        let settings = {
            let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
            Settings::load(store.as_ref())
        };
        if settings.dark_mode {
            self.appearance.set_dark(true);
        }

        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings.clone();
        self.open_modal(Modal::Settings);
        settings
    }

    /// Persist and apply new preferences
    pub fn save_settings(&self, settings: Settings) {
        let saved = {
            let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
            settings.save(store.as_mut())
        };

        if let Err(e) = saved {
            tracing::error!(error = %e, "Failed to persist settings");
            self.presenter
                .error(format!("Failed to save settings: {}", e));
            return;
        }

        self.appearance.apply(&settings);
        self.presenter.set_auto_hide(settings.auto_hide);
        self.notifier.set_enabled(settings.sound_enabled);
        tracing::info!(
            camera_quality = %settings.camera_quality,
            sensitivity = settings.sensitivity,
            sound = settings.sound_enabled,
            auto_hide = settings.auto_hide,
            dark_mode = settings.dark_mode,
            "Settings saved"
        );
        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings;

        self.presenter.success(SETTINGS_SAVED);
        self.remove_modal(Modal::Settings);
    }

    fn remove_modal(&self, modal: Modal) {
        self.modals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&modal);
    }

    /// Close one dialog, dropping any records it was showing
    pub async fn close(&self, modal: Modal) {
        self.remove_modal(modal);

        match modal {
            Modal::MyAttendance => self.session.employee().write().await.clear(),
            Modal::Attendance => self.session.attendance().write().await.clear(),
            Modal::Registration | Modal::Settings => {}
        }
    }

    pub async fn close_all(&self) {
        for modal in self.open_modals() {
            self.close(modal).await;
        }
    }

    /// Dispatch a shortcut. `field` is the text of the focused input.
    pub async fn handle_key(&self, key: KeyEvent, focus: Focus, field: &str) -> Option<KeyOutcome> {
        let action = Action::for_key(key, focus)?;
        tracing::debug!(%key, ?action, "Shortcut");

        let view = match action {
            Action::CloseAll => {
                self.close_all().await;
                None
            }
            Action::Capture => {
                self.capture_attendance().await;
                None
            }
            Action::OpenRegistration => {
                self.open_registration();
                None
            }
            Action::LoadMyAttendance => {
                self.load_my_attendance(field).await;
                None
            }
            Action::Search => Some(self.search_records(field).await),
        };

        Some(KeyOutcome { action, view })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StaticSource;
    use crate::client::{
        CaptureResponse, ClientResult, RecordsResponse, RegistrationResponse,
    };
    use crate::presenter::StatusKind;
    use crate::records::AttendanceRecord;
    use crate::settings::{CameraQuality, MemoryStore};
    use async_trait::async_trait;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::AtomicUsize;

    /// Scripted API: answers from fixed responses and counts calls
    #[derive(Default)]
    struct ScriptedApi {
        calls: AtomicUsize,
        capture: Option<CaptureResponse>,
        register: Option<RegistrationResponse>,
        records: Option<RecordsResponse>,
        delay: Option<Duration>,
    }

    impl ScriptedApi {
        async fn hit<T: Clone>(&self, reply: &Option<T>) -> ClientResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            reply.clone().ok_or(ClientError::Http { status: 500 })
        }
    }

    #[async_trait]
    impl AttendanceApi for ScriptedApi {
        async fn capture(&self, _image: &str) -> ClientResult<CaptureResponse> {
            self.hit(&self.capture).await
        }

        async fn register(&self, _r: &RegistrationRequest) -> ClientResult<RegistrationResponse> {
            self.hit(&self.register).await
        }

        async fn get_attendance(&self, _passkey: &str) -> ClientResult<RecordsResponse> {
            self.hit(&self.records).await
        }

        async fn get_employee_attendance(&self, _id: &str) -> ClientResult<RecordsResponse> {
            self.hit(&self.records).await
        }
    }

    fn noisy_frame() -> RgbImage {
        let mut rng = fastrand::Rng::with_seed(7);
        RgbImage::from_fn(320, 240, |_, _| Rgb([rng.u8(..), rng.u8(..), rng.u8(..)]))
    }

    fn kiosk_with(api: Arc<ScriptedApi>, config: Config) -> Kiosk {
        let mut kiosk = Kiosk::new(config, api, Box::new(MemoryStore::new()), None)
            .with_demo_seed(42);
        kiosk.attach_camera(Box::new(StaticSource::new(noisy_frame())));
        kiosk
    }

    fn kiosk(api: Arc<ScriptedApi>) -> Kiosk {
        let mut config = Config::default();
        config.records.export_dir = std::env::temp_dir().to_string_lossy().into_owned();
        kiosk_with(api, config)
    }

    #[tokio::test]
    async fn test_capture_match() {
        let api = Arc::new(ScriptedApi {
            capture: Some(CaptureResponse {
                matched: Some("Asha Rao".to_string()),
                similarity: Some(91.6),
                timestamp: Some("2026-10-16 09:00:00".to_string()),
                message: None,
            }),
            ..Default::default()
        });
        let kiosk = kiosk(api.clone());

        kiosk.capture_attendance().await;

        let status = kiosk.presenter().current();
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(
            status.message,
            "✅ Attendance marked for Asha Rao\n🎯 Confidence: 92%\n🕒 2026-10-16 09:00:00"
        );
        assert_eq!(kiosk.activity().entries()[0].headline(), "Asha Rao - Attendance Marked");
        assert!(kiosk.capture_enabled());
        assert!(kiosk.loading().current().is_none());
        assert!(!kiosk.session().is_processing());
    }

    #[tokio::test]
    async fn test_capture_no_match() {
        let api = Arc::new(ScriptedApi {
            capture: Some(CaptureResponse::default()),
            ..Default::default()
        });
        let kiosk = kiosk(api);

        kiosk.capture_attendance().await;

        let status = kiosk.presenter().current();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.message, format!("❌ {}", NO_MATCH));
        assert!(kiosk.activity().entries().is_empty());
    }

    #[tokio::test]
    async fn test_capture_http_error() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));

        kiosk.capture_attendance().await;

        assert_eq!(
            kiosk.presenter().current().message,
            "Network error: HTTP error! status: 500. Check logs for details."
        );
    }

    #[tokio::test]
    async fn test_capture_without_frame_makes_no_request() {
        let api = Arc::new(ScriptedApi::default());
        let mut kiosk = Kiosk::new(
            Config::default(),
            api.clone(),
            Box::new(MemoryStore::new()),
            None,
        );
        kiosk.attach_camera(Box::new(StaticSource::warming_up()));

        kiosk.capture_attendance().await;

        assert_eq!(kiosk.presenter().current().message, CAPTURE_FAILED);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_camera_denied_disables_controls() {
        let mut kiosk = Kiosk::new(
            Config::default(),
            Arc::new(ScriptedApi::default()),
            Box::new(MemoryStore::new()),
            None,
        );

        assert!(!kiosk.attach_camera(Box::new(StaticSource::denied())));
        assert!(!kiosk.capture_enabled());
        assert!(!kiosk.register_enabled());
        assert_eq!(kiosk.presenter().current().message, CAMERA_DENIED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_capture_is_rejected() {
        let api = Arc::new(ScriptedApi {
            capture: Some(CaptureResponse::default()),
            delay: Some(Duration::from_secs(1)),
            ..Default::default()
        });
        let kiosk = kiosk(api.clone());

        let first = kiosk.capture_attendance();
        let second = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            kiosk.register_face("2011", "Asha Rao", "EMP042").await;
            kiosk.presenter().current()
        };
        let ((), status) = tokio::join!(first, second);

        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.message, ALREADY_PROCESSING);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_registration_validation_makes_no_request() {
        let api = Arc::new(ScriptedApi::default());
        let kiosk = kiosk(api.clone());

        kiosk.register_face("9999", "Asha Rao", "EMP042").await;
        assert_eq!(kiosk.presenter().current().message, validation::INVALID_PASSKEY);

        kiosk.register_face("2011", "Asha R2", "EMP042").await;
        assert_eq!(kiosk.presenter().current().message, validation::INVALID_NAME_CHARS);

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registration_success_closes_modal() {
        let api = Arc::new(ScriptedApi {
            register: Some(RegistrationResponse {
                success: true,
                message: None,
                timestamp: Some("2026-10-16T09:00:00Z".to_string()),
            }),
            ..Default::default()
        });
        let kiosk = kiosk(api);

        kiosk.open_registration();
        kiosk.register_face("2011", "Asha Rao", "emp042").await;

        assert_eq!(
            kiosk.presenter().current().message,
            "✅ Face registered successfully for Asha Rao\n🆔 Employee ID: EMP042\n🕒 2026-10-16T09:00:00Z"
        );
        assert!(kiosk.is_open(Modal::Registration));

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(!kiosk.is_open(Modal::Registration));
    }

    #[tokio::test]
    async fn test_registration_already_registered() {
        let api = Arc::new(ScriptedApi {
            register: Some(RegistrationResponse {
                success: false,
                message: Some("Employee already exists".to_string()),
                timestamp: None,
            }),
            ..Default::default()
        });
        let kiosk = kiosk(api);

        kiosk.register_face("2011", "Asha Rao", "EMP042").await;

        let status = kiosk.presenter().current();
        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.message, "⚠️ Face already registered!\nEmployee already exists");
    }

    #[tokio::test]
    async fn test_load_attendance_falls_back_to_demo() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));

        kiosk.open_attendance();
        kiosk.load_attendance("2011").await;

        let status = kiosk.presenter().current();
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.message, "✅ Loaded 25 records (demo data)");

        let dashboard = kiosk.admin_dashboard(DateFilter::All).await;
        assert_eq!(dashboard.provenance, Provenance::Demo);
        assert_eq!(dashboard.stats.total_records, 25);
    }

    #[tokio::test]
    async fn test_demo_fallback_can_be_disabled() {
        let mut config = Config::default();
        config.records.demo_fallback = false;
        let kiosk = kiosk_with(Arc::new(ScriptedApi::default()), config);

        kiosk.load_my_attendance("emp042").await;

        assert_eq!(kiosk.presenter().current().kind, StatusKind::Error);
        assert!(kiosk.personal_dashboard(DateFilter::All).await.is_none());
    }

    #[tokio::test]
    async fn test_load_my_attendance_live() {
        let now = Utc::now();
        let api = Arc::new(ScriptedApi {
            records: Some(RecordsResponse {
                success: true,
                records: vec![
                    AttendanceRecord::new("Asha Rao", now).employee_id("EMP042"),
                    AttendanceRecord::new("Asha Rao", now - chrono::Duration::days(1))
                        .employee_id("EMP042"),
                ],
                message: None,
            }),
            ..Default::default()
        });
        let kiosk = kiosk(api);

        kiosk.open_my_attendance().await;
        kiosk.load_my_attendance(" emp042 ").await;

        assert_eq!(
            kiosk.presenter().current().message,
            "✅ Loaded 2 attendance records for EMP042"
        );
        let dashboard = kiosk.personal_dashboard(DateFilter::All).await.unwrap();
        assert_eq!(dashboard.title, "Employee Dashboard - EMP042");
        assert_eq!(dashboard.stats.total_days, 2);
        assert_eq!(dashboard.view.list.rows.len(), 2);

        kiosk.close_all().await;
        assert!(kiosk.session().current_employee_id().await.is_none());
        assert!(kiosk.open_modals().is_empty());
    }

    #[tokio::test]
    async fn test_load_attendance_rejects_bad_passkey() {
        let api = Arc::new(ScriptedApi::default());
        let kiosk = kiosk(api.clone());

        kiosk.load_attendance("1234").await;

        assert_eq!(kiosk.presenter().current().message, validation::INVALID_PASSKEY);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_export_empty_list() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));

        assert!(kiosk.export_all().await.is_none());
        assert_eq!(kiosk.presenter().current().message, "No data to export");

        assert!(kiosk.export_personal().await.is_none());
        assert_eq!(kiosk.presenter().current().message, "No personal data to export");
    }

    #[tokio::test]
    async fn test_save_settings_applies_immediately() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));

        let mut settings = kiosk.open_settings();
        assert!(kiosk.is_open(Modal::Settings));
        settings.dark_mode = true;
        settings.auto_hide = false;
        settings.camera_quality = CameraQuality::High;
        kiosk.save_settings(settings);

        assert!(kiosk.appearance().is_dark());
        assert!(!kiosk.presenter().auto_hide());
        assert!(!kiosk.is_open(Modal::Settings));
        assert_eq!(kiosk.presenter().current().message, SETTINGS_SAVED);
        assert_eq!(kiosk.open_settings().camera_quality, CameraQuality::High);
    }

    #[tokio::test]
    async fn test_handle_key() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));

        kiosk.open_settings();
        kiosk.open_attendance();
        let outcome = kiosk.handle_key(KeyEvent::Escape, Focus::None, "").await.unwrap();
        assert_eq!(outcome.action, Action::CloseAll);
        assert!(outcome.view.is_none());
        assert!(kiosk.open_modals().is_empty());

        let outcome = kiosk.handle_key(KeyEvent::Alt('r'), Focus::None, "").await.unwrap();
        assert_eq!(outcome.action, Action::OpenRegistration);
        assert!(kiosk.is_open(Modal::Registration));

        assert_eq!(kiosk.handle_key(KeyEvent::Enter, Focus::None, "").await, None);
    }

    fn two_people() -> RecordsResponse {
        let now = Utc::now();
        RecordsResponse {
            success: true,
            records: vec![
                AttendanceRecord::new("Asha Rao", now).employee_id("EMP042"),
                AttendanceRecord::new("Vikram Das", now).employee_id("EMP007"),
            ],
            message: None,
        }
    }

    #[tokio::test]
    async fn test_enter_in_search_field_returns_results() {
        let api = Arc::new(ScriptedApi {
            records: Some(two_people()),
            ..Default::default()
        });
        let kiosk = kiosk(api);
        kiosk.open_attendance();
        kiosk.load_attendance("2011").await;

        let outcome = kiosk
            .handle_key(KeyEvent::Enter, Focus::Search, "asha")
            .await
            .unwrap();

        assert_eq!(outcome.action, Action::Search);
        let view = outcome.view.unwrap();
        assert_eq!(view.title, "Search Results for \"asha\" (1 found)");
        assert_eq!(view.list.rows.len(), 1);
        assert!(view.list.rows[0].title.starts_with("Asha Rao"));
    }

    #[tokio::test]
    async fn test_enter_in_employee_id_field_loads_records() {
        let api = Arc::new(ScriptedApi {
            records: Some(two_people()),
            ..Default::default()
        });
        let kiosk = kiosk(api.clone());
        kiosk.open_my_attendance().await;

        let outcome = kiosk
            .handle_key(KeyEvent::Enter, Focus::EmployeeId, "emp042")
            .await
            .unwrap();

        assert_eq!(outcome.action, Action::LoadMyAttendance);
        assert!(outcome.view.is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            kiosk.presenter().current().message,
            "✅ Loaded 2 attendance records for EMP042"
        );
        assert_eq!(
            kiosk.session().current_employee_id().await.as_deref(),
            Some("EMP042")
        );
    }

    #[tokio::test]
    async fn test_alt_a_captures() {
        let api = Arc::new(ScriptedApi {
            capture: Some(CaptureResponse {
                matched: Some("Asha Rao".to_string()),
                similarity: Some(90.0),
                timestamp: None,
                message: None,
            }),
            ..Default::default()
        });
        let kiosk = kiosk(api.clone());

        let outcome = kiosk.handle_key(KeyEvent::Alt('a'), Focus::None, "").await.unwrap();

        assert_eq!(outcome.action, Action::Capture);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert_eq!(kiosk.presenter().current().kind, StatusKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_requests_restore_controls() {
        let api = Arc::new(ScriptedApi {
            capture: Some(CaptureResponse::default()),
            register: Some(RegistrationResponse::default()),
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let kiosk = kiosk(api);

        let during = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            kiosk.capture_enabled()
        };
        let (timed_out, enabled_during) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(100), kiosk.capture_attendance()),
            during
        );
        assert!(timed_out.is_err());
        assert!(!enabled_during);
        assert!(kiosk.capture_enabled());
        assert!(!kiosk.session().is_processing());
        assert!(kiosk.loading().current().is_none());

        let timed_out = tokio::time::timeout(
            Duration::from_millis(100),
            kiosk.register_face("2011", "Asha Rao", "EMP042"),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(kiosk.register_enabled());
        assert!(!kiosk.session().is_processing());
    }

    #[tokio::test]
    async fn test_open_my_attendance_closes_admin_view() {
        let kiosk = kiosk(Arc::new(ScriptedApi::default()));
        kiosk.open_attendance();
        kiosk.load_attendance("2011").await;
        assert_eq!(kiosk.admin_dashboard(DateFilter::All).await.stats.total_records, 25);

        kiosk.open_my_attendance().await;

        assert!(!kiosk.is_open(Modal::Attendance));
        assert!(kiosk.is_open(Modal::MyAttendance));
        assert_eq!(kiosk.admin_dashboard(DateFilter::All).await.stats.total_records, 0);
    }
}
