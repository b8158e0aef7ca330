use fretefip_core::Query;
use serde::{Deserialize, Serialize};

/// Filters of a freight metrics query.
///
/// Unset fields and empty lists are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsFilter {
    /// Freight unit, e.g. `R$/UND` or `R$/TON`.
    pub tipo_frete: Option<String>,
    pub origem: Option<String>,
    pub destino: Option<String>,
    #[serde(default)]
    pub produtos: Vec<String>,
    /// Look-back window in days.
    pub periodo_dias: Option<u32>,
}

impl MetricsFilter {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(tipo_frete) = &self.tipo_frete {
            query.insert("tipo_frete", tipo_frete);
        }
        if let Some(origem) = &self.origem {
            query.insert("origem", origem);
        }
        if let Some(destino) = &self.destino {
            query.insert("destino", destino);
        }
        if !self.produtos.is_empty() {
            query.insert("produtos", self.produtos.clone());
        }
        if let Some(periodo_dias) = self.periodo_dias {
            query.insert("periodo_dias", periodo_dias);
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsReport {
    pub success: bool,
    pub data: Option<MetricsData>,
    pub filters_applied: Option<AppliedFilters>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsData {
    #[serde(default)]
    pub count: u64,
    pub avg_price: Option<f64>,
    pub avg_distance: Option<f64>,
}

/// Filters as echoed back by the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppliedFilters {
    pub tipo_frete: Option<String>,
    pub origem: Option<String>,
    pub destino: Option<String>,
    #[serde(default)]
    pub produtos: Vec<String>,
    pub periodo_dias: Option<u32>,
}

/// Price forecast request for one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub origem: String,
    pub destino: String,
    #[serde(default)]
    pub produtos: Vec<String>,
    #[serde(default)]
    pub veiculos: Vec<String>,
    #[serde(default)]
    pub carrocerias: Vec<String>,
    pub months_ahead: u32,
}

impl ForecastRequest {
    pub fn new(origem: impl Into<String>, destino: impl Into<String>, months_ahead: u32) -> Self {
        Self {
            origem: origem.into(),
            destino: destino.into(),
            produtos: Vec::new(),
            veiculos: Vec::new(),
            carrocerias: Vec::new(),
            months_ahead,
        }
    }

    pub fn produtos<S: Into<String>>(mut self, produtos: impl IntoIterator<Item = S>) -> Self {
        self.produtos = produtos.into_iter().map(Into::into).collect();
        self
    }

    pub fn veiculos<S: Into<String>>(mut self, veiculos: impl IntoIterator<Item = S>) -> Self {
        self.veiculos = veiculos.into_iter().map(Into::into).collect();
        self
    }

    pub fn carrocerias<S: Into<String>>(mut self, carrocerias: impl IntoIterator<Item = S>) -> Self {
        self.carrocerias = carrocerias.into_iter().map(Into::into).collect();
        self
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new().with("origem", &self.origem).with("destino", &self.destino);
        for (name, values) in [
            ("produtos", &self.produtos),
            ("veiculos", &self.veiculos),
            ("carrocerias", &self.carrocerias),
        ] {
            if !values.is_empty() {
                query.insert(name, values.clone());
            }
        }
        query.insert("months_ahead", self.months_ahead);
        query
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastReport {
    pub success: bool,
    #[serde(default)]
    pub forecast_data: Vec<ForecastPoint>,
    pub statistics: Option<ForecastStatistics>,
    pub route_info: Option<RouteInfo>,
}

/// One predicted price. The model emits four points per month.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPoint {
    /// ISO 8601 timestamp.
    pub date: String,
    pub preco_previsto: f64,
}

impl ForecastPoint {
    /// Calendar day part of `date`.
    pub fn day(&self) -> &str {
        self.date.split('T').next().unwrap_or(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastStatistics {
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteInfo {
    pub origem: String,
    pub uf_origem: Option<String>,
    pub destino: String,
    pub uf_destino: Option<String>,
    pub km: Option<f64>,
}
