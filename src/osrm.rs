//! OSRM HTTP adapter for road route geometry.

use serde::Deserialize;

use crate::error::RouteError;
use crate::geo::Coordinates;
use crate::legs::RouteGeometry;
use crate::polyline::Polyline;
use crate::traits::RouteGeometryProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Waypoints accepted per route request.
    pub max_waypoints: usize,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            max_waypoints: 25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, points: &[Coordinates]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=false",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl RouteGeometryProvider for OsrmClient {
    fn fetch_route(&self, points: &[Coordinates]) -> Result<RouteGeometry, RouteError> {
        if points.len() > self.config.max_waypoints {
            return Err(RouteError::TooManyWaypoints {
                count: points.len(),
                max: self.config.max_waypoints,
            });
        }

        let body = self
            .client
            .get(self.route_url(points))
            .send()?
            .json::<OsrmRouteResponse>()?;

        body.into_geometry()
    }

    fn max_waypoints(&self) -> usize {
        self.config.max_waypoints
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    duration: f64,
}

impl OsrmRouteResponse {
    fn into_geometry(self) -> Result<RouteGeometry, RouteError> {
        if self.code != "Ok" {
            return Err(RouteError::Status {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let route = self.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
        if route.geometry.kind != "LineString" {
            return Err(RouteError::MalformedGeometry(format!(
                "expected LineString, got {}",
                route.geometry.kind
            )));
        }
        if route.geometry.coordinates.len() < 2 {
            return Err(RouteError::MalformedGeometry(format!(
                "route has {} points",
                route.geometry.coordinates.len()
            )));
        }

        let points = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinates::new(lng, lat))
            .collect();
        let leg_hours = route.legs.iter().map(|leg| leg.duration / 3600.0).collect();

        Ok(RouteGeometry::new(Polyline::new(points))
            .with_total_hours(route.duration / 3600.0)
            .with_leg_hours(leg_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<RouteGeometry, RouteError> {
        serde_json::from_str::<OsrmRouteResponse>(json)
            .expect("valid response json")
            .into_geometry()
    }

    #[test]
    fn test_parses_route() {
        let geometry = parse(
            r#"{
                "code": "Ok",
                "routes": [{
                    "duration": 7200.0,
                    "distance": 180000.0,
                    "geometry": {"type": "LineString", "coordinates": [[-112.1, 36.1], [-112.0, 36.5], [-111.9, 37.0]]},
                    "legs": [{"duration": 3600.0, "distance": 90000.0}, {"duration": 3600.0, "distance": 90000.0}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(geometry.polyline.len(), 3);
        assert_eq!(geometry.polyline.points()[0], Coordinates::new(-112.1, 36.1));
        assert_eq!(geometry.total_hours, Some(2.0));
        assert_eq!(geometry.leg_hours, Some(vec![1.0, 1.0]));
    }

    #[test]
    fn test_error_code() {
        let err = parse(r#"{"code": "NoSegment", "message": "Could not find a segment"}"#).unwrap_err();
        assert!(matches!(err, RouteError::Status { ref code, .. } if code == "NoSegment"));
    }

    #[test]
    fn test_too_few_points_is_malformed() {
        let err = parse(
            r#"{"code": "Ok", "routes": [{"duration": 1.0, "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0]]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::MalformedGeometry(_)));
    }

    #[test]
    fn test_empty_routes() {
        let err = parse(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert!(matches!(err, RouteError::NoRoute));
    }

    #[test]
    fn test_waypoint_limit_checked_before_request() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            max_waypoints: 2,
            ..OsrmConfig::default()
        })
        .unwrap();
        let points = vec![Coordinates::new(0.0, 0.0); 3];
        let err = client.fetch_route(&points).unwrap_err();
        assert!(matches!(err, RouteError::TooManyWaypoints { count: 3, max: 2 }));
    }

    #[test]
    fn test_route_url() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let url = client.route_url(&[Coordinates::new(-112.1, 36.1), Coordinates::new(-111.9, 37.0)]);
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/car/-112.100000,36.100000;-111.900000,37.000000?overview=full&geometries=geojson&steps=false"
        );
    }
}
