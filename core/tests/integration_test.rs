use std::collections::HashMap;
use wps_execute::api::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn kvp(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = [
        ("service", "WPS"),
        ("request", "Execute"),
        ("version", "1.0.0"),
        ("identifier", "buffer"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    params.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    params
}

fn xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wps:Execute service="WPS" version="1.0.0"
    xmlns:wps="http://www.opengis.net/wps/1.0.0"
    xmlns:ows="http://www.opengis.net/ows/1.1"
    xmlns:xlink="http://www.w3.org/1999/xlink">
  <ows:Identifier>buffer</ows:Identifier>
  {}
</wps:Execute>"#,
        body
    )
}

#[test]
fn test_literal_and_reference_parity() {
    init_logging();
    let parser = ExecuteParser::default();

    let from_xml = parser
        .parse_xml(
            xml(r#"<wps:DataInputs>
                 <wps:Input><ows:Identifier>size</ows:Identifier>
                   <wps:Data><wps:LiteralData uom="m">10</wps:LiteralData></wps:Data></wps:Input>
                 <wps:Input><ows:Identifier>data</ows:Identifier>
                   <wps:Reference xlink:href="http://example.com/roads.gml" method="POST"/></wps:Input>
               </wps:DataInputs>"#)
            .as_bytes(),
        )
        .unwrap();

    let from_kvp = parser
        .parse_kvp(&kvp(&[(
            "datainputs",
            "size=10@uom=m;data=@xlink:href=http://example.com/roads.gml@method=POST",
        )]))
        .unwrap();

    assert_eq!(from_xml, from_kvp);
}

#[test]
fn test_padded_literal_parity() {
    init_logging();
    let parser = ExecuteParser::default();

    let from_xml = parser
        .parse_xml(
            xml(r#"<wps:DataInputs><wps:Input><ows:Identifier>s</ows:Identifier>
                 <wps:Data><wps:LiteralData>  two  spaces </wps:LiteralData></wps:Data></wps:Input>
               </wps:DataInputs>"#)
            .as_bytes(),
        )
        .unwrap();
    let from_kvp = parser
        .parse_kvp(&kvp(&[("datainputs", "s=  two  spaces ")]))
        .unwrap();

    assert_eq!(from_xml.data_inputs, from_kvp.data_inputs);
}

#[test]
fn test_response_document_parity() {
    init_logging();
    let parser = ExecuteParser::default();

    let from_xml = parser
        .parse_xml(
            xml(r#"<wps:ResponseForm>
                 <wps:ResponseDocument storeExecuteResponse="true" status="True" lineage="yes">
                   <wps:Output asReference="true" mimeType="application/json">
                     <ows:Identifier>buffered</ows:Identifier></wps:Output>
                 </wps:ResponseDocument></wps:ResponseForm>"#)
            .as_bytes(),
        )
        .unwrap();

    let from_kvp = parser
        .parse_kvp(&kvp(&[
            ("responsedocument", "buffered=@asReference=true@mimeType=application/json"),
            ("storeexecuteresponse", "true"),
            ("status", "True"),
            ("lineage", "yes"),
        ]))
        .unwrap();

    assert_eq!(from_xml.response_form, from_kvp.response_form);
    let doc = &from_xml.response_form.response_document;
    assert!(doc.store_execute_response && doc.status && !doc.lineage);
}

#[test]
fn test_missing_version_same_error_kind() {
    init_logging();
    let parser = ExecuteParser::default();

    let body = r#"<wps:Execute xmlns:wps="http://www.opengis.net/wps/1.0.0"
        xmlns:ows="http://www.opengis.net/ows/1.1"><ows:Identifier>p</ows:Identifier></wps:Execute>"#;
    let xml_err = parser.parse_xml(body.as_bytes()).unwrap_err();

    let mut params = kvp(&[]);
    params.remove("version");
    let kvp_err = parser.parse_kvp(&params).unwrap_err();

    assert_eq!(xml_err, ParseError::missing("version"));
    assert_eq!(xml_err, kvp_err);
}

#[test]
fn test_default_language_from_config() {
    init_logging();
    let parser = ExecuteParser::new(ParserConfig::new().with_default_language("cs"));
    assert_eq!(parser.parse_xml(xml("").as_bytes()).unwrap().language, "cs");
    assert_eq!(parser.parse_kvp(&kvp(&[])).unwrap().language, "cs");
}

#[test]
fn test_absent_response_form_is_empty_not_error() {
    init_logging();
    let req = ExecuteParser::default().parse_xml(xml("").as_bytes()).unwrap();
    assert!(req.response_form.response_document.outputs.is_empty());
    assert!(req.response_form.raw_data_output.is_empty());
    assert!(!req.response_form.response_document.store_execute_response);
}

#[test]
fn test_raw_data_output_parity() {
    init_logging();
    let parser = ExecuteParser::default();

    let from_xml = parser
        .parse_xml(
            xml(r#"<wps:ResponseForm><wps:RawDataOutput mimeType="image/tiff">
                 <ows:Identifier>raster</ows:Identifier></wps:RawDataOutput></wps:ResponseForm>"#)
            .as_bytes(),
        )
        .unwrap();
    let from_kvp = parser
        .parse_kvp(&kvp(&[("rawdataoutput", "raster=@mimeType=image/tiff")]))
        .unwrap();

    assert_eq!(from_xml.response_form, from_kvp.response_form);
}

#[test]
fn test_request_serializes_for_engine_handoff() {
    init_logging();
    let req = ExecuteParser::default()
        .parse_query("service=WPS&request=Execute&version=1.0.0&identifier=buffer&datainputs=size%3D10")
        .unwrap();
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["identifier"], "buffer");
    assert_eq!(json["data_inputs"][0]["value"]["type"], "LiteralValue");

    let back: Request = serde_json::from_value(json).unwrap();
    assert_eq!(back, req);
}

#[test]
fn test_concurrent_parsing_is_isolated() {
    init_logging();
    let parser = std::sync::Arc::new(ExecuteParser::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let body = format!(
                    r#"<wps:Execute version="1.0.0" xmlns:wps="http://www.opengis.net/wps/1.0.0"
                        xmlns:ows="http://www.opengis.net/ows/1.1">
                        <ows:Identifier>process-{}</ows:Identifier></wps:Execute>"#,
                    i
                );
                parser.parse_xml(body.as_bytes()).unwrap().identifier
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("process-{}", i));
    }
}
