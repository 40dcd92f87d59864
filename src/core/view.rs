use crate::core::controller::FormController;
use crate::core::{LocationService, PredictionResult, PredictionService};
use crate::utils::currency::format_try;
use std::fmt;

pub const TITLE: &str = "🏡 Akıllı Emlakçı";
pub const SUBTITLE: &str = "Hayalinizdeki evin değerini öğrenin";
pub const CITY_PLACEHOLDER: &str = "Şehir Seçiniz";
pub const DISTRICT_PLACEHOLDER: &str = "İlçe Seçiniz";
pub const DISTRICT_PLACEHOLDER_NO_CITY: &str = "Önce Şehir Seçin";
pub const SUBMIT_LABEL: &str = "Fiyatı Gör";
pub const SUBMIT_LABEL_LOADING: &str = "Hesaplanıyor...";
pub const RESULT_HEADING: &str = "Tahmini Değer";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub price_text: String,
    pub location_label: String,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        Self {
            price_text: format_try(result.tahmin_fiyat),
            location_label: result.konum.clone(),
        }
    }
}

/// Everything the form shows, derived from controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub city_options: Vec<String>,
    pub city_placeholder: &'static str,
    pub selected_city: String,
    pub district_options: Vec<String>,
    pub district_placeholder: &'static str,
    pub district_enabled: bool,
    pub selected_district: String,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

impl FormView {
    pub fn from_controller<L: LocationService, P: PredictionService>(
        controller: &FormController<L, P>,
    ) -> Self {
        let loading = controller.is_loading();
        let district_enabled = controller.district_enabled();

        Self {
            city_options: controller.cities().to_vec(),
            city_placeholder: CITY_PLACEHOLDER,
            selected_city: controller.state().selected_city.clone(),
            district_options: controller.districts().to_vec(),
            district_placeholder: if district_enabled {
                DISTRICT_PLACEHOLDER
            } else {
                DISTRICT_PLACEHOLDER_NO_CITY
            },
            district_enabled,
            selected_district: controller.state().selected_district.clone(),
            submit_enabled: !loading,
            submit_label: if loading {
                SUBMIT_LABEL_LOADING
            } else {
                SUBMIT_LABEL
            },
            error: controller.error_message().map(str::to_string),
            result: controller.result().map(ResultView::from),
        }
    }
}

/// Plain-text rendering for the terminal front end.
impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", SUBTITLE)?;
        writeln!(
            f,
            "  Şehir: {}",
            non_empty_or(&self.selected_city, self.city_placeholder)
        )?;

        let district = non_empty_or(&self.selected_district, self.district_placeholder);
        if self.district_enabled {
            writeln!(f, "  İlçe: {}", district)?;
        } else {
            writeln!(f, "  İlçe: {} (devre dışı)", district)?;
        }

        writeln!(f, "  [{}]", self.submit_label)?;

        if let Some(error) = &self.error {
            writeln!(f, "⚠️  {}", error)?;
        }

        if let Some(result) = &self.result {
            writeln!(f, "{}", RESULT_HEADING)?;
            writeln!(f, "  {}", result.price_text)?;
            writeln!(f, "  {}", result.location_label)?;
        }

        Ok(())
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
