mod common;

use common::{client, mock_any, mock_read, mock_read_times, mock_write, received_bodies};
use keenergy::Position;
use keenergy::client::Error;
use keenergy::controls::{HeatCircuitOperatingMode, HotWaterTankOperatingMode};
use keenergy::value::Value;
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

fn device_info() -> serde_json::Value {
    json!([{
        "ret": "OK",
        "revNo": 2,
        "orderNo": 12345678,
        "serNo": 12345678,
        "name": "MOCKED-NAME",
        "variantNo": 0,
    }])
}

#[tokio::test]
async fn device_info_without_status() {
    let server = MockServer::start().await;
    mock_any(&server, "/deviceControl", ResponseTemplate::new(200).set_body_json(device_info())).await;
    let client = client(&server);
    let device = client.device();
    let info = device.get_device_info().await.unwrap();
    assert_eq!(serde_json::Value::Object(info), json!({
        "revNo": 2,
        "orderNo": 12345678,
        "serNo": 12345678,
        "name": "MOCKED-NAME",
        "variantNo": 0,
    }));
    assert_eq!(device.get_name().await.unwrap(), "MOCKED-NAME");
    assert_eq!(device.get_serial_number().await.unwrap(), 12345678);
    assert_eq!(device.get_revision_number().await.unwrap(), 2);
    assert_eq!(device.get_variant_number().await.unwrap(), 0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    assert!(requests.iter().all(|r| r.url.query() == Some("action=getDeviceInfo")));
    assert!(requests.iter().all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn system_info_from_single_object() {
    let server = MockServer::start().await;
    let body = json!({"ret": "OK", "name": "KeEnergy.MTec", "version": "2.2.2"});
    mock_any(&server, "/swupdate", ResponseTemplate::new(200).set_body_json(body)).await;
    let client = client(&server);
    let info = client.device().get_system_info().await.unwrap();
    assert_eq!(serde_json::Value::Object(info), json!({"name": "KeEnergy.MTec", "version": "2.2.2"}));
}

#[tokio::test]
async fn missing_device_field() {
    let server = MockServer::start().await;
    let body = json!([{"ret": "OK", "name": "MOCKED-NAME", "serNo": "n/a"}]);
    mock_any(&server, "/deviceControl", ResponseTemplate::new(200).set_body_json(body)).await;
    let client = client(&server);
    let error = client.device().get_revision_number().await.unwrap_err();
    assert!(matches!(error, Error::MissingField("revNo")));
    let error = client.device().get_serial_number().await.unwrap_err();
    assert!(matches!(error, Error::InvalidField { field: "serNo", .. }));
}

#[tokio::test]
async fn positions() {
    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatPumps", "attr": "1"},
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatingCircuits", "attr": "1"},
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHotWaterTanks", "attr": "1"},
        ]),
        json!([
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatPumps", "value": "1"},
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatingCircuits", "value": "2"},
            {"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHotWaterTanks", "value": "3"},
        ]),
    )
    .await;
    let client = client(&server);
    let position = client.system().get_positions().await.unwrap();
    assert_eq!(position, Position { heat_pump: 1, heat_circuit: 2, hot_water_tank: 3 });
}

#[tokio::test]
async fn system_counts_and_outdoor_temperature() {
    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatPumps", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHeatPumps", "value": "2"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.outdoorTemp.values.actValue", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.outdoorTemp.values.actValue", "value": "10.808357"}]),
    )
    .await;
    let client = client(&server);
    assert_eq!(client.system().get_number_of_heat_pumps().await.unwrap(), 2);
    assert_eq!(client.system().get_outdoor_temperature().await.unwrap(), 10.81);
}

#[tokio::test]
async fn system_read_values_skips_other_groups() {
    use keenergy::ReadOptions;
    use keenergy::controls::{Control, HeatPump, System};

    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.options.systemNumberOfHotWaterTanks", "attr": "1"}]),
        json!([{
            "name": "APPL.CtrlAppl.sParam.options.systemNumberOfHotWaterTanks",
            "attributes": {"formatId": "fmt2p0", "longText": "Qty hot water tanks", "upperLimit": "4"},
            "value": "1",
        }]),
    )
    .await;
    let client = client(&server);
    let controls = [Control::from(HeatPump::Name), Control::from(System::HotWaterTankNumbers)];
    let values = client.system().read_values(&controls, ReadOptions::default()).await.unwrap();
    assert_eq!(values.len(), 1);
    let tanks = &values["hot_water_tank_numbers"][0];
    assert_eq!(tanks.value, Value::Integer(1));
    assert_eq!(tanks.attribute("upperLimit"), Some(&json!("4")));
    assert_eq!(tanks.attribute("longText"), None);
}

#[tokio::test]
async fn hot_water_tank_limits() {
    let server = MockServer::start().await;
    mock_read_times(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.hotWaterTank[1].param.normalSetTempMax.value", "attr": "1"}]),
        json!([{
            "name": "APPL.CtrlAppl.sParam.hotWaterTank[1].param.normalSetTempMax.value",
            "attributes": {"formatId": "fmtTemp", "lowerLimit": "20", "upperLimit": "52", "unitId": "Temp"},
            "value": "47",
        }]),
        2,
    )
    .await;
    let client = client(&server);
    let tank = client.hot_water_tank();
    assert_eq!(tank.get_lower_limit_temperature(2).await.unwrap(), 20.0);
    assert_eq!(tank.get_upper_limit_temperature(2).await.unwrap(), 52.0);
}

#[tokio::test]
async fn hot_water_tank_setters_address_one_unit() {
    let server = MockServer::start().await;
    mock_write(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.hotWaterTank[1].param.normalSetTempMax.value", "value": "47"}]),
    )
    .await;
    mock_write(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.hotWaterTank[0].param.operatingMode", "value": "3"}]),
    )
    .await;
    let client = client(&server);
    let tank = client.hot_water_tank();
    tank.set_max_temperature(47.0, 2).await.unwrap();
    tank.set_operating_mode(HotWaterTankOperatingMode::HeatUp, 1).await.unwrap();
}

#[tokio::test]
async fn invalid_mode_makes_no_request() {
    let server = MockServer::start().await;
    let client = client(&server);
    let error = client.hot_water_tank().set_operating_mode("INVALID", 1).await.unwrap_err();
    assert!(matches!(error, Error::InvalidMode { .. }));
    let error = client.heat_circuit().set_operating_mode(9_i64, 1).await.unwrap_err();
    assert!(matches!(error, Error::InvalidMode { .. }));
    assert!(received_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn operating_mode_codes() {
    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.hotWaterTank[0].param.operatingMode", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.hotWaterTank[0].param.operatingMode", "value": "3"}]),
    )
    .await;
    let client = client(&server);
    let mode = client.hot_water_tank().get_operating_mode(1, false).await.unwrap();
    assert_eq!(mode, Value::Integer(3));
}

#[tokio::test]
async fn heat_pump_getters() {
    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].param.name", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].param.name", "value": "WPS26"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].values.heatpumpState", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].values.heatpumpState", "value": "1"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].CircPump.values.setValueScaled", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].CircPump.values.setValueScaled", "value": "0.5"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].TempCompressorIn.values.actValue", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].TempCompressorIn.values.actValue", "value": "26.4"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].LowPressure.values.actValue", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatpump[0].LowPressure.values.actValue", "value": "14.8125"}]),
    )
    .await;
    let client = client(&server);
    let heat_pump = client.heat_pump();
    assert_eq!(heat_pump.get_name(1).await.unwrap(), "WPS26");
    assert_eq!(heat_pump.get_status(1, true).await.unwrap(), Value::Text("flow".into()));
    assert_eq!(heat_pump.get_circulation_pump(1).await.unwrap(), 0.5);
    assert_eq!(heat_pump.get_compressor_input_temperature(1).await.unwrap(), 26.4);
    assert_eq!(heat_pump.get_low_pressure(1).await.unwrap(), 14.81);
}

#[tokio::test]
async fn heat_circuit_setters() {
    let server = MockServer::start().await;
    mock_write(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.normalSetTemp", "value": "23"}]),
    )
    .await;
    mock_write(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[2].param.offsetRoomTemp", "value": "1.5"}]),
    )
    .await;
    mock_write(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[1].param.operatingMode", "value": "5"}]),
    )
    .await;
    let client = client(&server);
    let circuit = client.heat_circuit();
    circuit.set_day_temperature(23.0, 1).await.unwrap();
    circuit.set_offset_temperature(1.5, 3).await.unwrap();
    circuit.set_operating_mode(HeatCircuitOperatingMode::Party, 2).await.unwrap();
    assert_eq!(received_bodies(&server).await.len(), 3);
}

#[tokio::test]
async fn heat_circuit_getters() {
    let server = MockServer::start().await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.name", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.name", "value": "FBH"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.holidaySetTemp", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.holidaySetTemp", "value": "14"}]),
    )
    .await;
    mock_read(
        &server,
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.thresholdNightTemp.value", "attr": "0"}]),
        json!([{"name": "APPL.CtrlAppl.sParam.heatCircuit[0].param.thresholdNightTemp.value", "value": "16"}]),
    )
    .await;
    let client = client(&server);
    let circuit = client.heat_circuit();
    assert_eq!(circuit.get_name(1).await.unwrap(), "FBH");
    assert_eq!(circuit.get_holiday_temperature(1).await.unwrap(), 14.0);
    assert_eq!(circuit.get_night_temperature_threshold(1).await.unwrap(), 16.0);
}
