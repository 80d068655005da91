pub mod rtc_token;
