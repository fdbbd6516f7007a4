//! Kakao Map Embed
//!
//! 상권 좌표 하나를 표시하는 임베드용 HTML 생성

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{
    CHART_HEIGHT, DEFAULT_MAP_LEVEL, KAKAO_SDK_URL, KOREA_LAT_RANGE, KOREA_LON_RANGE,
    MAP_LOAD_TIMEOUT_MS,
};
use crate::error::DashboardError;
use crate::models::{Area, Panel, Placeholder};

pub const MISSING_KEY_MESSAGE: &str =
    "카카오 JavaScript 키가 없습니다. .env 또는 .env.local에 'KAKAO_JAVASCRIPT_KEY'를 설정하세요.";
pub const MISSING_COORDINATES_MESSAGE: &str = "선택한 상권의 좌표(lat/lon)를 찾을 수 없습니다.";

/// 임베드 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEmbed {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    pub height: u32,
    pub html: String,
}

/// Kakao Maps 렌더러
#[derive(Debug, Clone)]
pub struct MapRenderer {
    api_key: Option<String>,
    height: u32,
}

impl MapRenderer {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            height: CHART_HEIGHT,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 상권 위치 지도
    ///
    /// 키가 없거나 좌표가 없거나 대한민국 범위를 벗어나면 `MapUnavailable`.
    pub fn render(&self, area: &Area) -> Result<Panel<MapEmbed>, DashboardError> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(unavailable(MISSING_KEY_MESSAGE));
        };

        let Some((lat, lon)) = area.coordinates().filter(|(lat, lon)| in_korea(*lat, *lon)) else {
            tracing::debug!(area = area.code, "map coordinates missing or out of range");
            return Ok(unavailable(MISSING_COORDINATES_MESSAGE));
        };

        let label = area.label();
        let html = embed_html(&sdk_url(key)?, lat, lon, &label, self.height);
        Ok(Panel::Ready(MapEmbed {
            lat,
            lon,
            label,
            height: self.height,
            html,
        }))
    }
}

fn unavailable(reason: &str) -> Panel<MapEmbed> {
    Panel::Placeholder(Placeholder::MapUnavailable {
        reason: reason.to_string(),
    })
}

pub fn in_korea(lat: f64, lon: f64) -> bool {
    (KOREA_LAT_RANGE.0..=KOREA_LAT_RANGE.1).contains(&lat)
        && (KOREA_LON_RANGE.0..=KOREA_LON_RANGE.1).contains(&lon)
}

/// SDK 스크립트 URL (autoload=false, kakao.maps.load 로 초기화)
fn sdk_url(key: &str) -> Result<String, DashboardError> {
    let mut url = Url::parse(KAKAO_SDK_URL)
        .map_err(|e| DashboardError::Config(format!("Invalid Kakao SDK URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("appkey", key)
        .append_pair("autoload", "false");
    Ok(url.to_string())
}

/// HTML 본문과 JS 작은따옴표 문자열 양쪽에 안전한 텍스트
fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

fn embed_html(sdk_src: &str, lat: f64, lon: f64, label: &str, height: u32) -> String {
    let label = escape_label(label);
    format!(
        r#"<div id="kmap" style="width:100%; height:{height}px; position:relative;"></div>
<div id="kmsg" style="position:absolute;top:8px;left:8px;background:#fff8;border:1px solid #ddd;padding:4px 8px;border-radius:6px;font-size:12px;display:none;"></div>
<script>
(function() {{
    var container = document.getElementById('kmap');
    var msg = document.getElementById('kmsg');

    function showMsg(t) {{
        msg.innerText = t;
        msg.style.display = 'block';
    }}

    function initMap() {{
        try {{
            var pos = new kakao.maps.LatLng({lat}, {lon});
            var map = new kakao.maps.Map(container, {{ center: pos, level: {level} }});
            var marker = new kakao.maps.Marker({{ position: pos }});
            marker.setMap(map);

            var iwContent = '<div style="padding:6px 8px; font-size:12px; white-space:nowrap;">{label}</div>';
            var infowindow = new kakao.maps.InfoWindow({{ position: pos, content: iwContent }});
            infowindow.open(map, marker);

            window.addEventListener('resize', function() {{
                var c = map.getCenter();
                setTimeout(function() {{ map.relayout(); map.setCenter(c); }}, 0);
            }});
        }} catch (e) {{
            showMsg("카카오맵 초기화 오류: " + e);
        }}
    }}

    function loadSdk() {{
        if (window.kakao && kakao.maps) {{
            initMap();
            return;
        }}
        var s = document.createElement('script');
        s.src = '{sdk_src}';
        s.onload = function() {{
            if (window.kakao && kakao.maps && kakao.maps.load) {{
                kakao.maps.load(initMap);
            }} else {{
                showMsg("SDK가 로드되었지만 kakao.maps 객체가 없습니다. (도메인/키 확인 필요)");
            }}
        }};
        s.onerror = function() {{
            showMsg("SDK 스크립트 로드 실패(네트워크/차단 가능성).");
        }};
        document.head.appendChild(s);

        setTimeout(function() {{
            if (!(window.kakao && kakao.maps)) {{
                showMsg("지도 SDK 로딩 실패. Kakao Developers에서 도메인과 JS 키를 확인하세요.");
            }}
        }}, {timeout});
    }}

    loadSdk();
}})();
</script>
"#,
        height = height,
        lat = lat,
        lon = lon,
        level = DEFAULT_MAP_LEVEL,
        label = label,
        sdk_src = sdk_src,
        timeout = MAP_LOAD_TIMEOUT_MS,
    )
}
