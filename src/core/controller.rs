use crate::core::{
    FailureKind, FormField, FormState, LocationService, LocationTaxonomy, PredictionResult,
    PredictionService, RequestPayload, UiStatus,
};
use crate::utils::error::Result;

pub const VALIDATION_MESSAGE: &str = "Lütfen İl ve İlçe seçiniz.";
pub const LOCATIONS_UNAVAILABLE: &str =
    "Sunucuya bağlanılamadı. Lütfen daha sonra tekrar deneyin.";
pub const PREDICTION_FAILED: &str = "Hata: Tahmin yapılamadı. Sunucu yanıt vermiyor olabilir.";

/// A submission that passed validation and is waiting for the prediction
/// service. Only the most recently issued token is applied on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub token: u64,
    pub payload: RequestPayload,
}

/// Owns the dependent city/district form: taxonomy, raw input and the
/// Idle/Loading/Success/Error status that drives rendering.
pub struct FormController<L: LocationService, P: PredictionService> {
    locations: L,
    predictor: P,
    taxonomy: LocationTaxonomy,
    cities: Vec<String>,
    districts: Vec<String>,
    state: FormState,
    status: UiStatus,
    last_failure: Option<FailureKind>,
    latest_token: u64,
}

impl<L: LocationService, P: PredictionService> FormController<L, P> {
    pub fn new(locations: L, predictor: P) -> Self {
        Self {
            locations,
            predictor,
            taxonomy: LocationTaxonomy::new(),
            cities: Vec::new(),
            districts: Vec::new(),
            state: FormState::default(),
            status: UiStatus::Idle,
            last_failure: None,
            latest_token: 0,
        }
    }

    /// One-shot startup fetch of the taxonomy. Failure leaves the city list
    /// empty and shows a fixed message; nothing is retried.
    pub async fn load_locations(&mut self) {
        tracing::debug!("Fetching location taxonomy");

        match self.locations.fetch_locations().await {
            Ok(taxonomy) => {
                tracing::info!("📍 Loaded {} cities", taxonomy.len());
                self.cities = taxonomy.cities();
                self.taxonomy = taxonomy;
            }
            Err(e) => {
                tracing::error!("❌ Failed to load cities: {}", e);
                self.last_failure = Some(e.failure_kind());
                self.status = UiStatus::Error(LOCATIONS_UNAVAILABLE.to_string());
            }
        }
    }

    pub fn select_city(&mut self, city: &str) {
        self.state.selected_city = city.to_string();
        self.districts = self
            .taxonomy
            .districts(city)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        self.state.selected_district.clear();

        tracing::debug!(
            "City selected: '{}' ({} districts)",
            city,
            self.districts.len()
        );
    }

    /// Returns `false` when the district control is disabled (no city yet) or
    /// the district is not an option of the selected city.
    pub fn select_district(&mut self, district: &str) -> bool {
        if !self.district_enabled() {
            tracing::warn!("Ignoring district '{}' while no city is selected", district);
            return false;
        }

        if !self.districts.iter().any(|d| d == district) {
            tracing::warn!(
                "Ignoring district '{}': not an option for '{}'",
                district,
                self.state.selected_city
            );
            return false;
        }

        self.state.selected_district = district.to_string();
        true
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.set_field(field, value.into());
    }

    /// Full submission: validate, call the prediction service, apply the
    /// outcome. Loading is always cleared before returning.
    pub async fn submit(&mut self) -> &UiStatus {
        if let Some(pending) = self.begin_submission() {
            let outcome = self.predictor.predict(&pending.payload).await;
            self.finish_submission(pending.token, outcome);
        }
        &self.status
    }

    /// Enters Loading and validates. Returns `None` (status already set to
    /// the validation error) when city or district is missing.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        self.latest_token += 1;
        self.status = UiStatus::Loading;
        self.last_failure = None;

        let Some(payload) = RequestPayload::from_form(&self.state) else {
            tracing::debug!("Submission rejected: city or district missing");
            self.last_failure = Some(FailureKind::Validation);
            self.status = UiStatus::Error(VALIDATION_MESSAGE.to_string());
            return None;
        };

        tracing::debug!("Submitting prediction request #{}: {:?}", self.latest_token, payload);

        Some(PendingSubmission {
            token: self.latest_token,
            payload,
        })
    }

    /// Applies a prediction outcome. Outcomes for superseded tokens are
    /// dropped and `false` is returned.
    pub fn finish_submission(&mut self, token: u64, outcome: Result<PredictionResult>) -> bool {
        if token != self.latest_token {
            tracing::debug!(
                "Dropping stale prediction response #{} (latest is #{})",
                token,
                self.latest_token
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!("✅ Prediction received for {}", result.konum);
                self.status = UiStatus::Success(result);
            }
            Err(e) => {
                tracing::error!("❌ Prediction failed: {}", e);
                self.last_failure = Some(e.failure_kind());
                self.status = UiStatus::Error(PREDICTION_FAILED.to_string());
            }
        }
        true
    }

    pub fn taxonomy(&self) -> &LocationTaxonomy {
        &self.taxonomy
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn districts(&self) -> &[String] {
        &self.districts
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn status(&self) -> &UiStatus {
        &self.status
    }

    pub fn district_enabled(&self) -> bool {
        !self.state.selected_city.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, UiStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            UiStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.status {
            UiStatus::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EmlakError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockLocations {
        taxonomy: Option<LocationTaxonomy>,
    }

    #[async_trait]
    impl LocationService for MockLocations {
        async fn fetch_locations(&self) -> Result<LocationTaxonomy> {
            self.taxonomy.clone().ok_or_else(|| EmlakError::Status {
                status: 502,
                url: "http://test/cities".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockPredictor {
        calls: Arc<AtomicUsize>,
        last_payload: Arc<Mutex<Option<RequestPayload>>>,
        fail: bool,
    }

    #[async_trait]
    impl PredictionService for MockPredictor {
        async fn predict(&self, payload: &RequestPayload) -> Result<PredictionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(payload.clone());

            if self.fail {
                return Err(EmlakError::Status {
                    status: 500,
                    url: "http://test/predict".to_string(),
                });
            }

            Ok(PredictionResult {
                tahmin_fiyat: 2_500_000.0,
                konum: format!("{} / {}", payload.il, payload.ilce),
            })
        }
    }

    fn sample_taxonomy() -> LocationTaxonomy {
        LocationTaxonomy::from_iter([
            ("İstanbul", vec!["Kadıköy", "Beşiktaş"]),
            ("Ankara", vec!["Çankaya"]),
            ("Bursa", vec![]),
        ])
    }

    async fn loaded_controller(
        predictor: MockPredictor,
    ) -> FormController<MockLocations, MockPredictor> {
        let mut controller = FormController::new(
            MockLocations {
                taxonomy: Some(sample_taxonomy()),
            },
            predictor,
        );
        controller.load_locations().await;
        controller
    }

    #[tokio::test]
    async fn test_cities_equal_taxonomy_keys() {
        let controller = loaded_controller(MockPredictor::default()).await;

        assert_eq!(controller.cities(), ["İstanbul", "Ankara", "Bursa"]);
        assert_eq!(controller.status(), &UiStatus::Idle);
        assert!(controller.districts().is_empty());
    }

    #[tokio::test]
    async fn test_location_failure_sets_fixed_message() {
        let mut controller =
            FormController::new(MockLocations { taxonomy: None }, MockPredictor::default());
        controller.load_locations().await;

        assert!(controller.cities().is_empty());
        assert_eq!(controller.error_message(), Some(LOCATIONS_UNAVAILABLE));
        assert_eq!(controller.last_failure(), Some(FailureKind::Status(502)));
    }

    #[tokio::test]
    async fn test_city_change_repopulates_and_clears_district() {
        let mut controller = loaded_controller(MockPredictor::default()).await;

        controller.select_city("İstanbul");
        assert_eq!(controller.districts(), ["Kadıköy", "Beşiktaş"]);
        assert!(controller.select_district("Beşiktaş"));
        assert_eq!(controller.state().selected_district, "Beşiktaş");

        controller.select_city("Ankara");
        assert_eq!(controller.districts(), ["Çankaya"]);
        assert_eq!(controller.state().selected_district, "");

        controller.select_city("Adana");
        assert!(controller.districts().is_empty());
        assert!(controller.district_enabled());

        controller.select_city("Bursa");
        assert!(controller.districts().is_empty());
    }

    #[tokio::test]
    async fn test_district_from_other_city_is_rejected() {
        let predictor = MockPredictor::default();
        let mut controller = loaded_controller(predictor.clone()).await;

        controller.select_city("Ankara");
        assert!(!controller.select_district("Kadıköy"));
        assert_eq!(controller.state().selected_district, "");

        controller.submit().await;
        assert_eq!(controller.error_message(), Some(VALIDATION_MESSAGE));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);

        assert!(controller.select_district("Çankaya"));
        assert_eq!(controller.state().selected_district, "Çankaya");
    }

    #[tokio::test]
    async fn test_district_disabled_without_city() {
        let mut controller = loaded_controller(MockPredictor::default()).await;

        assert!(!controller.district_enabled());
        assert!(!controller.select_district("Kadıköy"));
        assert_eq!(controller.state().selected_district, "");
    }

    #[tokio::test]
    async fn test_submit_without_district_makes_no_call() {
        let predictor = MockPredictor::default();
        let mut controller = loaded_controller(predictor.clone()).await;

        controller.select_city("Ankara");
        let status = controller.submit().await.clone();

        assert_eq!(status, UiStatus::Error(VALIDATION_MESSAGE.to_string()));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.last_failure(), Some(FailureKind::Validation));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_submit_success_sends_parsed_payload() {
        let predictor = MockPredictor::default();
        let mut controller = loaded_controller(predictor.clone()).await;

        controller.select_city("İstanbul");
        controller.select_district("Kadıköy");
        controller.set_field(FormField::Area, "120");
        controller.set_field(FormField::RoomCount, "3");
        controller.set_field(FormField::LivingRoomCount, "1");

        controller.submit().await;

        let result = controller.result().unwrap();
        assert_eq!(result.tahmin_fiyat, 2_500_000.0);
        assert_eq!(result.konum, "İstanbul / Kadıköy");
        assert_eq!(controller.error_message(), None);

        let payload = predictor.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(payload.metrekare, 120.0);
        assert_eq!(payload.oda_sayisi, 3.0);
        assert_eq!(payload.salon_sayisi, 1.0);
    }

    #[tokio::test]
    async fn test_submit_failure_collapses_to_generic_message() {
        let predictor = MockPredictor {
            fail: true,
            ..Default::default()
        };
        let mut controller = loaded_controller(predictor.clone()).await;

        controller.select_city("Ankara");
        controller.select_district("Çankaya");
        controller.submit().await;

        assert_eq!(controller.error_message(), Some(PREDICTION_FAILED));
        assert_eq!(controller.last_failure(), Some(FailureKind::Status(500)));
        assert!(!controller.is_loading());
        assert!(controller.result().is_none());
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_result() {
        let mut controller = loaded_controller(MockPredictor::default()).await;

        controller.select_city("Ankara");
        controller.select_district("Çankaya");
        controller.submit().await;
        assert!(controller.result().is_some());

        controller.select_city("İstanbul");
        controller.submit().await;
        assert!(controller.result().is_none());
        assert_eq!(controller.error_message(), Some(VALIDATION_MESSAGE));
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let mut controller = loaded_controller(MockPredictor::default()).await;
        controller.select_city("Ankara");
        controller.select_district("Çankaya");

        let first = controller.begin_submission().unwrap();
        let second = controller.begin_submission().unwrap();
        assert!(second.token > first.token);

        let applied = controller.finish_submission(
            first.token,
            Ok(PredictionResult {
                tahmin_fiyat: 1.0,
                konum: "eski".to_string(),
            }),
        );
        assert!(!applied);
        assert!(controller.is_loading());

        let applied = controller.finish_submission(
            second.token,
            Ok(PredictionResult {
                tahmin_fiyat: 2.0,
                konum: "yeni".to_string(),
            }),
        );
        assert!(applied);
        assert_eq!(controller.result().unwrap().konum, "yeni");
    }
}
