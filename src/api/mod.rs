pub mod quote_proxy;
